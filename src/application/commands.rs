//! CLI commands and handlers

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use super::quote_session::QuoteSession;
use super::services::{parse_amount, SwapService};
use crate::domain::execution::{ExecutionResult, SwapParams};
use crate::domain::quote::Quote;
use crate::shared::utils::deadline_after;

#[derive(Parser, Debug)]
#[command(name = "pushyswap")]
#[command(version, about = "Cross-chain swap quotes and demo execution on Push Chain")]
pub struct Cli {
    /// Path to config file (optional)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use fallback prices only, without calling the price oracle
    #[arg(long, global = true)]
    pub offline: bool,

    /// Approve real proof transactions without prompting
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List supported tokens, pools and chains
    Tokens,

    /// Quote a swap
    Quote {
        token_in: String,
        token_out: String,
        amount: String,
    },

    /// Quote and execute a swap
    Swap {
        token_in: String,
        token_out: String,
        amount: String,

        /// Slippage tolerance in percent (defaults to config)
        #[arg(short, long)]
        slippage: Option<f64>,

        /// Receiving address, the connected wallet by default
        #[arg(short, long, default_value = "self")]
        recipient: String,

        /// Minutes until the swap deadline (defaults to config)
        #[arg(long)]
        deadline_minutes: Option<i64>,

        /// Simulate execution on an external DEX instead of the native chain
        #[arg(long)]
        real_dex: bool,
    },

    /// Read amounts from stdin, one per line, and quote each after a quiet period
    Watch { token_in: String, token_out: String },
}

/// Defaults for swap parameters not given on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapDefaults {
    pub slippage: f64,
    pub deadline_minutes: i64,
}

#[derive(Serialize)]
struct SwapOutput<'a> {
    result: &'a str,
    genuine: bool,
    outcome: &'a ExecutionResult,
}

pub struct CommandExecutor {
    service: Arc<SwapService>,
    session: Arc<QuoteSession>,
    defaults: SwapDefaults,
    json: bool,
}

impl CommandExecutor {
    pub fn new(
        service: Arc<SwapService>,
        session: Arc<QuoteSession>,
        defaults: SwapDefaults,
        json: bool,
    ) -> Self {
        Self {
            service,
            session,
            defaults,
            json,
        }
    }

    /// Execute the selected command
    pub async fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Tokens => self.execute_tokens_command(),
            Commands::Quote {
                token_in,
                token_out,
                amount,
            } => self.execute_quote_command(&token_in, &token_out, &amount).await,
            Commands::Swap {
                token_in,
                token_out,
                amount,
                slippage,
                recipient,
                deadline_minutes,
                real_dex: _,
            } => {
                let deadline_minutes = deadline_minutes.unwrap_or(self.defaults.deadline_minutes);
                let params = SwapParams {
                    amount_in: parse_amount(&amount)?,
                    token_in,
                    token_out,
                    slippage_tolerance: slippage.unwrap_or(self.defaults.slippage),
                    recipient,
                    deadline: deadline_after(deadline_minutes).with_context(|| {
                        format!("deadline of {} minutes is out of range", deadline_minutes)
                    })?,
                };
                self.execute_swap_command(&params).await
            }
            Commands::Watch {
                token_in,
                token_out,
            } => self.execute_watch_command(token_in, token_out).await,
        }
    }

    fn execute_tokens_command(&self) -> Result<()> {
        let registry = self.service.registry();
        if self.json {
            println!("{}", serde_json::to_string_pretty(registry.tokens())?);
            return Ok(());
        }

        println!("Tokens:");
        for token in registry.tokens() {
            println!(
                "  [{}] {:<6} {:<14} decimals={:<2} chain={}",
                token.glyph(),
                token.symbol,
                token.name,
                token.decimals,
                token.origin_chain.as_str()
            );
        }
        println!("Pools:");
        for pool in registry.pools() {
            println!("  {:<12} fee={:.2}%", pool.id, pool.fee * 100.0);
        }
        println!("Chains:");
        for chain in registry.chains() {
            let id = chain.chain_id.map_or_else(|| "-".to_string(), |id| id.to_string());
            println!(
                "  {:<26} id={:<6} native={}",
                chain.name, id, chain.native_currency.symbol
            );
        }
        Ok(())
    }

    async fn execute_quote_command(&self, token_in: &str, token_out: &str, amount: &str) -> Result<()> {
        let quote = self.service.get_quote(token_in, token_out, amount).await?;
        self.print_quote(&quote)
    }

    async fn execute_swap_command(&self, params: &SwapParams) -> Result<()> {
        let result = self.service.execute_swap(params).await?;

        if self.json {
            let output = SwapOutput {
                result: result.as_str(),
                genuine: result.is_genuine(),
                outcome: &result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        match &result {
            ExecutionResult::Submitted(hash) => println!("Transaction confirmed: {}", hash),
            ExecutionResult::NoTransaction(sentinel) => {
                println!("No transaction executed ({})", sentinel.as_str())
            }
            ExecutionResult::DemoHash(hash) => println!("Demo reference (not on-chain): {}", hash),
            ExecutionResult::ExternalDex { venue, reference } => {
                println!("Executed on {} (simulated): {}", venue, reference)
            }
        }
        Ok(())
    }

    async fn execute_watch_command(&self, token_in: String, token_out: String) -> Result<()> {
        info!(token_in = %token_in, token_out = %token_out, "watching stdin for amounts");

        let input = BufReader::new(tokio::io::stdin());
        watch_amounts(&self.session, &token_in, &token_out, input, |quote| {
            self.print_quote(&quote)
        })
        .await
    }

    fn print_quote(&self, quote: &Quote) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(quote)?);
            return Ok(());
        }

        let route: Vec<&str> = quote.route.iter().map(|p| p.id.as_str()).collect();
        println!(
            "{} {} -> {} {} via {}",
            quote.amount_in, quote.token_in, quote.amount_out, quote.token_out, quote.source
        );
        println!("  fee:            {} {}", quote.fee, quote.token_in);
        println!("  price impact:   {:.2}%", quote.price_impact);
        println!("  minimum output: {} {}", quote.minimum_amount_out, quote.token_out);
        println!("  route:          {}", route.join(" > "));
        Ok(())
    }
}

/// Quote each amount line once input has been quiet for the debounce period,
/// handing every settled quote to `emit` as soon as it is ready
pub async fn watch_amounts<R, F>(
    session: &QuoteSession,
    token_in: &str,
    token_out: &str,
    input: R,
    mut emit: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Quote) -> Result<()>,
{
    let mut lines = input.lines();
    let mut pending = FuturesUnordered::new();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line.context("read input")? {
                    Some(line) => {
                        let amount = line.trim().to_string();
                        if !amount.is_empty() {
                            pending.push(async move {
                                session.request(token_in, token_out, &amount).await
                            });
                        }
                    }
                    None => input_open = false,
                }
            }
            Some(answer) = pending.next(), if !pending.is_empty() => match answer {
                Ok(Some(quote)) => emit(quote)?,
                Ok(None) => {}
                Err(e) => warn!("quote rejected: {}", e),
            },
            else => break,
        }
    }
    Ok(())
}

//! User confirmation before a real transaction

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::execution::{ConfirmationRequest, TransactionConfirmer};

/// Fixed answer, for `--yes` and non-interactive runs
pub struct AutoConfirm(pub bool);

#[async_trait]
impl TransactionConfirmer for AutoConfirm {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        self.0
    }
}

/// Asks on the terminal and reads a y/N answer from stdin
pub struct StdinConfirmer;

impl StdinConfirmer {
    pub fn prompt(request: &ConfirmationRequest) -> String {
        format!(
            "Execute a real proof transaction on {} for {} {} -> {}? Gas is paid in {}. [y/N] ",
            request.network, request.amount_in, request.token_in, request.token_out, request.gas_symbol
        )
    }
}

#[async_trait]
impl TransactionConfirmer for StdinConfirmer {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        let prompt = Self::prompt(request);
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut stdout = io::stdout();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(e)) => {
                warn!("failed to read confirmation: {}", e);
                false
            }
            Err(e) => {
                warn!("confirmation prompt aborted: {}", e);
                false
            }
        }
    }
}

fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

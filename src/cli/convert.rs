use super::prompt::Prompt;
use super::ui;
use crate::core::input::{self, CurrencyCode, InputError};
use crate::core::rates::{ExchangeRateProvider, RateError, RateTable};
use crate::core::record::{self, ConversionRecord};
use crate::store::ConversionLog;
use anyhow::Result;
use chrono::Local;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, warn};

pub const AMOUNT_PROMPT: &str = "Amount: ";
pub const BASE_PROMPT: &str = "From: ";
pub const TARGET_PROMPT: &str = "To: ";

enum State {
    AwaitAmount,
    AwaitBase {
        amount: Decimal,
    },
    AwaitTarget {
        amount: Decimal,
        base: CurrencyCode,
        rates: RateTable,
    },
}

enum Reply {
    Line(String),
    End,
}

/// Runs an interactive conversion session at the rates of `date`.
///
/// The session ends on `END` at any prompt or when input runs out. The prompt
/// is closed on every exit path. Returns the records written, in order.
pub async fn run<R, W>(
    date: &str,
    provider: &dyn ExchangeRateProvider,
    log: &ConversionLog,
    mut prompt: Prompt<R, W>,
) -> Result<Vec<ConversionRecord>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let result = converse(date, provider, log, &mut prompt).await;
    let closed = prompt.close().await;
    let records = result?;
    closed?;
    debug!("Session ended after {} conversions", records.len());
    Ok(records)
}

async fn converse<R, W>(
    date: &str,
    provider: &dyn ExchangeRateProvider,
    log: &ConversionLog,
    prompt: &mut Prompt<R, W>,
) -> Result<Vec<ConversionRecord>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut records = Vec::new();
    let mut state = State::AwaitAmount;

    loop {
        state = match state {
            State::AwaitAmount => {
                let Reply::Line(line) = read_reply(prompt, AMOUNT_PROMPT).await? else {
                    break;
                };
                match input::parse_amount(&line) {
                    Ok(amount) => State::AwaitBase { amount },
                    Err(e) => {
                        prompt.say(&e.to_string()).await?;
                        State::AwaitAmount
                    }
                }
            }

            State::AwaitBase { amount } => {
                let Reply::Line(line) = read_reply(prompt, BASE_PROMPT).await? else {
                    break;
                };
                match line.parse::<CurrencyCode>() {
                    Err(e) => {
                        prompt.say(&e.to_string()).await?;
                        State::AwaitBase { amount }
                    }
                    Ok(base) => match fetch_rates(provider, &base, date).await {
                        Ok(rates) => State::AwaitTarget {
                            amount,
                            base,
                            rates,
                        },
                        Err(e) if e.is_recoverable() => {
                            warn!(error = %e, base = %base, "Failed to fetch exchange rates");
                            ui::print_error(e.user_message());
                            State::AwaitBase { amount }
                        }
                        Err(e) => return Err(e.into()),
                    },
                }
            }

            State::AwaitTarget {
                amount,
                base,
                rates,
            } => {
                let Reply::Line(line) = read_reply(prompt, TARGET_PROMPT).await? else {
                    break;
                };
                let target = line
                    .parse::<CurrencyCode>()
                    .ok()
                    .and_then(|target| rates.get(target.as_str()).map(|rate| (target, rate)));

                match target {
                    None => {
                        prompt
                            .say(&InputError::UnknownTargetCurrency.to_string())
                            .await?;
                        State::AwaitTarget {
                            amount,
                            base,
                            rates,
                        }
                    }
                    Some((target, rate)) => {
                        match record::convert(amount, rate) {
                            Some(converted) => {
                                let today = Local::now().date_naive();
                                let record =
                                    ConversionRecord::new(base, target, amount, converted, today);
                                prompt.say(&record.summary()).await?;

                                debug!(rate_date = %date, log_date = %today, "Logging conversion");
                                log.append(&record)?;
                                records.push(record);
                            }
                            None => {
                                prompt
                                    .say(&InputError::UnparseableAmount.to_string())
                                    .await?;
                            }
                        }
                        State::AwaitAmount
                    }
                }
            }
        };
    }

    Ok(records)
}

async fn read_reply<R, W>(prompt: &mut Prompt<R, W>, question: &str) -> Result<Reply>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match prompt.ask(question).await? {
        Some(line) if !input::is_end(&line) => Ok(Reply::Line(line)),
        _ => Ok(Reply::End),
    }
}

async fn fetch_rates(
    provider: &dyn ExchangeRateProvider,
    base: &CurrencyCode,
    date: &str,
) -> Result<RateTable, RateError> {
    let spinner = ui::new_spinner(format!("Fetching {base} rates for {date}"));
    let result = provider.fetch_rates(base.as_str(), date).await;
    spinner.finish_and_clear();
    result
}

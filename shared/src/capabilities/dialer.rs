use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MAX_NUMBER_LEN: usize = 32;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DialError {
    #[error("dial number is empty")]
    Empty,

    #[error("dial number too long ({len} > {max})")]
    TooLong { len: usize, max: usize },

    #[error("dial number contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Telephone number accepted by the platform dialer: digits, `*` and `#`,
/// with an optional leading `+`. Spaces and dashes are stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialNumber(String);

impl DialNumber {
    pub fn new(raw: &str) -> Result<Self, DialError> {
        let number: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();

        if number.is_empty() {
            return Err(DialError::Empty);
        }
        if number.len() > MAX_NUMBER_LEN {
            return Err(DialError::TooLong {
                len: number.len(),
                max: MAX_NUMBER_LEN,
            });
        }
        for (i, c) in number.chars().enumerate() {
            let ok = c.is_ascii_digit() || c == '*' || c == '#' || (c == '+' && i == 0);
            if !ok {
                return Err(DialError::InvalidCharacter(c));
            }
        }
        if number == "+" {
            return Err(DialError::Empty);
        }
        Ok(Self(number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn tel_uri(&self) -> String {
        format!("tel:{}", self.0)
    }
}

impl fmt::Display for DialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum DialerOperation {
    Call { number: DialNumber, uri: String },
}

impl Operation for DialerOperation {
    type Output = ();
}

pub struct Dialer<E> {
    context: CapabilityContext<DialerOperation, E>,
}

impl<Ev> Capability<Ev> for Dialer<Ev> {
    type Operation = DialerOperation;
    type MappedSelf<MappedEv> = Dialer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Dialer::new(self.context.map_event(f))
    }
}

impl<E> Dialer<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<DialerOperation, E>) -> Self {
        Self { context }
    }

    /// Fire-and-forget: hands the number to the platform telephony handler.
    pub fn call(&self, number: DialNumber) {
        let uri = number.tel_uri();
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(DialerOperation::Call { number, uri }).await;
        });
    }
}

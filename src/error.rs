use std::fmt;

use liaise::{Liaise, RegisterErrors};

#[derive(RegisterErrors, Debug, Copy, Clone, PartialEq, Eq)]
#[error_prefix = "TETH"] // Sets the reporting prefix
pub enum TetherCode {
    SlotOccupied = 1,
    StatusUnset = 2,
    StatusNotOk = 3,
    PromoteFailed = 4,
}

impl Liaise for TetherCode {
    fn code_id(self) -> u16 { self as u16 }

    fn message(self) -> &'static str {
        match self {
            Self::SlotOccupied => "Slot already occupied",
            Self::StatusUnset => "Status unset",
            Self::StatusNotOk => "Status not ok",
            Self::PromoteFailed => "Promotion failed",
        }
    }
}

/// Error type for the fallible conveniences layered on top of the owners.
///
/// The owners themselves never fail: a dead weak reference or a failed status
/// is reported through the ordinary return value (`null`, `false`). This type
/// only exists for callers that prefer `?` over checking those values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TetherError {
    pub code: TetherCode,
    pub ctx: Option<String>,
}

impl TetherError {
    #[inline]
    pub fn new(code: TetherCode) -> Self {
        Self { code, ctx: None }
    }

    #[inline]
    pub fn ctx(mut self, ctx: impl fmt::Display) -> Self {
        self.ctx = Some(ctx.to_string());
        self
    }

    #[inline]
    pub fn slot_occupied(addr: usize) -> Self {
        Self::new(TetherCode::SlotOccupied).ctx(format_args!("holding {addr:#x}"))
    }

    #[inline]
    pub fn status_unset() -> Self {
        Self::new(TetherCode::StatusUnset)
    }

    #[inline]
    pub fn status_not_ok(addr: usize) -> Self {
        Self::new(TetherCode::StatusNotOk).ctx(format_args!("status {addr:#x}"))
    }

    #[inline]
    pub fn promote_failed(addr: usize) -> Self {
        Self::new(TetherCode::PromoteFailed).ctx(format_args!("weak {addr:#x}"))
    }
}

impl fmt::Display for TetherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "[TETH0001] msg"
        let base = self.code.render();
        match &self.ctx {
            Some(ctx) => write!(f, "{base}: {ctx}"),
            None => write!(f, "{base}"),
        }
    }
}

impl std::error::Error for TetherError {}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub reviewed: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of the batch reached so far, counting the card on screen.
    ///
    /// `(reviewed + 1) / total` while cards remain, `1.0` once complete and
    /// `None` for an empty batch.
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        if self.is_complete {
            return Some(1.0);
        }
        #[allow(clippy::cast_precision_loss)]
        Some((self.reviewed + 1) as f64 / self.total as f64)
    }
}

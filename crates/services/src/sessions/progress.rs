/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Answered share of the total, rounded to the nearest whole percent.
    pub percent_answered: u8,
    pub is_complete: bool,
}

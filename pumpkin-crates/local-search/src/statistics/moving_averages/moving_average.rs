/// An average over a stream of terms.
pub trait MovingAverage<Term> {
    fn add_term(&mut self, new_term: Term);

    /// The current average; 0 when no terms have been added.
    fn value(&self) -> f64;
}

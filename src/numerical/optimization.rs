/// iteration trace, result type, `Minimizer` trait and the method factory
pub mod minimizer;
/// golden-section search, one new evaluation per iteration
pub mod golden_section;
/// dichotomy search with a perturbation δ around the midpoint
pub mod dichotomy;

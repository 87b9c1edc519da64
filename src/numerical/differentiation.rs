/// uniform sample grid over [a, b]
pub mod grid;
/// 3-point boundary formulas and RMSE shared by all schemes
pub mod diff_common;
/// right, left and central difference estimators
pub mod finite_differences;
/// all schemes on one grid, RMSE sweep over halving h
pub mod multi_estimator;

pub mod level_calculator;
pub mod level_effect;

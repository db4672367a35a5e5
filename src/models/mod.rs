pub mod order;
pub mod symbol_rules;

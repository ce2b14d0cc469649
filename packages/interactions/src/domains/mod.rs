// Business domains

pub mod interactions;

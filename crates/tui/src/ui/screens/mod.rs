pub mod accounts;
pub mod dashboard;
pub mod insights;
pub mod recurring;
pub mod transactions;

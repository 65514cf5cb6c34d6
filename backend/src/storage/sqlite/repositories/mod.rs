pub mod category_repository;
pub mod expense_repository;
pub mod income_repository;
pub mod profile_repository;

pub use category_repository::CategoryRepository;
pub use expense_repository::ExpenseRepository;
pub use income_repository::IncomeRepository;
pub use profile_repository::ProfileRepository;

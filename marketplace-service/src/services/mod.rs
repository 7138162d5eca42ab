pub mod database;
pub mod jwt;
pub mod onboarding;
pub mod orders;
pub mod storage;

pub use database::{Database, DashboardStats};
pub use jwt::{Claims, JwtService};
pub use onboarding::OnboardingService;
pub use orders::{CartLine, OrderService, PlacedOrder};
pub use storage::{LocalStorage, Storage};

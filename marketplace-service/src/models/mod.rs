pub mod category;
pub mod kyc_document;
pub mod order;
pub mod product;
pub mod user;

pub use category::Category;
pub use kyc_document::{DocumentStatus, DocumentType, KycDocument, PendingDocumentRow};
pub use order::{Order, OrderItem, OrderItemDetail, OrderStatus, OrderSummaryRow};
pub use product::{Product, ProductWithCategory};
pub use user::{SellerWithDocCounts, User, UserRole, UserStatus};

pub mod link;
pub mod visit;

pub use link::Entity as LinkEntity;
pub use visit::Entity as VisitEntity;

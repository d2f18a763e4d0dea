pub mod instruction_service;
pub mod notification_service;
pub mod order_registry;
pub mod session_store;

pub mod announcer;
pub mod order_service;

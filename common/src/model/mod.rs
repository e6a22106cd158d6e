pub mod draft_order;
pub mod print_request;

#[path = "../test_utils.rs"]
mod test_utils;

mod availability_test;
mod enrollment_test;
mod middleware_test;
mod server_test;

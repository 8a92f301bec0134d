mod property_tests;
mod rust_api_tests;

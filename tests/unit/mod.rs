/// Unit test suite over the public library API
mod basic_tests;
mod streak_properties;

mod test_scenario;
pub(crate) mod utils;

//! cfdeploy unit tests

mod test_config;
mod test_http_client;
mod test_poller;
mod test_publisher;

extern crate dewpoint;
extern crate env_logger;
#[macro_use]
extern crate log;

use std::env;
use std::io::{self, BufReader};

use dewpoint::host::{PrintSensorHandler, StateFeeder};
use dewpoint::{run_loop, setup_platform, MessageHandler, PlatformConfig, States};

fn main() -> Result<(), String> {
    env_logger::init();

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("DEWPOINT_CONFIG").ok())
        .ok_or("usage: dewpoint <config.toml> (or set DEWPOINT_CONFIG)")?;
    let config = PlatformConfig::load(&config_path).map_err(|err| err.to_string())?;

    let mut handlers: Vec<Box<dyn MessageHandler>> =
        vec![Box::new(StateFeeder::new(BufReader::new(io::stdin())))];

    for sensor in setup_platform(&config) {
        info!("Adding dew point sensor {}", sensor.entity_id());
        handlers.push(Box::new(sensor));
    }
    handlers.push(Box::new(PrintSensorHandler));

    run_loop(handlers, States::default());
    Ok(())
}

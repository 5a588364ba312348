use env_logger::Env;

use one_failover_core::{store::StateStore, transition::Resolver};
use one_failoverd::{
    command::SystemCommandRunner, config::Config, driver::EventLoop, service::OpenRc,
    toggler::ServiceToggler,
};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::default();
    log::info!(
        "Starting failover worker (fifo: {}, state: {})",
        config.fifo_path.display(),
        config.state_path.display()
    );

    let resolver = Resolver::new(StateStore::new(&config.state_path));
    let manager = OpenRc::new(SystemCommandRunner);
    let toggler = ServiceToggler::new(&config, manager);
    EventLoop::new(&config, resolver, toggler).run()
}

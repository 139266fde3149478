mod simulated;

pub use simulated::SimulatedSignupGateway;

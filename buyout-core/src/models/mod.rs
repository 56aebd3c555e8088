mod calc_inputs;
mod calc_results;
mod net_proceeds;

pub use calc_inputs::CalcInputs;
pub use calc_results::CalcResults;
pub use net_proceeds::NetProceedsRange;

use mockall::mock;

use cachepower_core::common::PowerError;
use cachepower_core::power::{CacheEnergyModel, CacheModelParams, ModelOutput, PowerModelFactory};
use cachepower_core::stats::AccessCounters;

mock! {
    pub EnergyModel {}
    impl CacheEnergyModel for EnergyModel {
        fn compute(&self, activity: &AccessCounters) -> Result<ModelOutput, PowerError>;
    }
}

mock! {
    pub ModelFactory {}
    impl PowerModelFactory for ModelFactory {
        fn build(&self, params: &CacheModelParams) -> Result<Box<dyn CacheEnergyModel>, PowerError>;
    }
}

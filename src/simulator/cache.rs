use crate::data::TimeGrid;
use crate::simulator::scaling::EffectiveParams;
use dashmap::DashMap;
use lazy_static::lazy_static;
use ndarray::Array1;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const CACHE_SIZE: usize = 10000;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    params: ParamsHash,
    grid: GridHash,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ParamsHash(u64);

impl ParamsHash {
    fn new(params: &EffectiveParams, administration_time: f64) -> Self {
        let mut hasher = DefaultHasher::new();
        for value in [
            params.onset_time,
            params.time_to_peak,
            params.plateau_duration,
            params.total_duration,
            params.peak_effect,
            administration_time,
        ] {
            value.to_bits().hash(&mut hasher);
        }
        ParamsHash(hasher.finish())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct GridHash(u64);

impl GridHash {
    fn new(grid: &TimeGrid) -> Self {
        let mut hasher = DefaultHasher::new();
        grid.step().to_bits().hash(&mut hasher);
        grid.len().hash(&mut hasher);
        GridHash(hasher.finish())
    }
}

lazy_static! {
    static ref CACHE: DashMap<CacheKey, Array1<f64>> = DashMap::with_capacity(CACHE_SIZE);
}

pub(crate) fn get_entry(
    params: &EffectiveParams,
    administration_time: f64,
    grid: &TimeGrid,
) -> Option<Array1<f64>> {
    let cache_key = CacheKey {
        params: ParamsHash::new(params, administration_time),
        grid: GridHash::new(grid),
    };

    CACHE
        .get(&cache_key)
        .map(|existing_entry| existing_entry.clone())
}

pub(crate) fn insert_entry(
    params: &EffectiveParams,
    administration_time: f64,
    grid: &TimeGrid,
    values: &Array1<f64>,
) {
    let cache_key = CacheKey {
        params: ParamsHash::new(params, administration_time),
        grid: GridHash::new(grid),
    };

    CACHE.insert(cache_key, values.clone());
}

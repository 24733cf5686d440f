#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate derive_builder;

mod buffer;
mod config;
mod data;
mod func;
mod initializer;
mod linalg;
mod net;
mod stats;
mod train;
mod utils;

use std::env;
use std::error::Error;
use std::io;

use crate::{
    config::{AutoencoderConfig, AutoencoderConfigBuilder},
    data::{PatchSet, read_csv_matrix},
    net::SparseAutoencoder,
    train::{MultithreadingOptions, PassOptions, PassTask},
};

const DEFAULT_PATCHES_PATH: &str = "c_patches.csv";
const DEFAULT_W1_PATH: &str = "W1.csv";
const DEFAULT_W2_PATH: &str = "W2.csv";
const USAGE: &str = "usage: sparse_autoencoder [PATCHES_CSV [W1_CSV W2_CSV]]";
const THREADS_VAR: &str = "SPARSE_AUTOENCODER_THREADS";

fn main() -> Result<(), Box<dyn Error>> {

    env_logger::init();

    let config: AutoencoderConfig = AutoencoderConfigBuilder::default().build()?;
    let args: Vec<String> = env::args().skip(1).collect();

    let (data_set, net) = match args.as_slice() {
        [] => (
            load_patches(&config, DEFAULT_PATCHES_PATH)?,
            load_net(&config, DEFAULT_W1_PATH, DEFAULT_W2_PATH)?,
        ),
        [patches_path] => {
            log::info!("no weight files given, initializing W1 and W2 from fixed seeds");
            (
                load_patches(&config, patches_path)?,
                SparseAutoencoder::new_random(&config, "W1", "W2"),
            )
        },
        [patches_path, w1_path, w2_path] => (
            load_patches(&config, patches_path)?,
            load_net(&config, w1_path, w2_path)?,
        ),
        _ => return Err(USAGE.into()),
    };

    if log::log_enabled!(log::Level::Debug) {
        log::debug!("reconstruction of the first patch: {:?}", net.reconstruct(data_set.get_row(0)));
    }

    let task = PassTask {
        task_id: "sparse_autoencoder".to_string(),
        net,
        data_set,
        config,
        options: PassOptions {
            multi_threading: multithreading_from_env()?,
            ..PassOptions::default()
        },
    };
    let result = task.exec()?;

    let output = &result.output;
    log::info!("cost = {}, elapsed = {}s", output.cost, result.elapsed.as_secs_f32());
    let [w1_norm, w2_norm, b1_norm, b2_norm] = output.gradients.norms();
    log::debug!(
        "gradient norms: W1 {}, W2 {}, b1 {}, b2 {}",
        w1_norm, w2_norm, b1_norm, b2_norm
    );
    log::debug!("rho_hat: {:?}", output.rho_hat);
    log::debug!("sparsity penalty: {:?}", output.sparsity_penalty);

    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.serialize(result.summary())?;
    writer.flush()?;

    Ok(())

}

/// Unset, empty or `0` runs single-threaded. `all` uses every logical cpu.
fn multithreading_from_env() -> Result<Option<MultithreadingOptions>, Box<dyn Error>> {
    let value = match env::var(THREADS_VAR) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    parse_worker_threads(&value)
}

fn parse_worker_threads(value: &str) -> Result<Option<MultithreadingOptions>, Box<dyn Error>> {
    match value.trim() {
        "" | "0" => Ok(None),
        "all" => Ok(Some(MultithreadingOptions::default())),
        n => Ok(Some(MultithreadingOptions { worker_threads: Some(n.parse()?) })),
    }
}

fn load_patches(config: &AutoencoderConfig, path: &str) -> Result<PatchSet, Box<dyn Error>> {
    log::info!("loading {} patches from {}", config.sample_count, path);
    Ok(PatchSet::from_csv(path, config.sample_count, config.visible_size)?)
}

fn load_net(config: &AutoencoderConfig, w1_path: &str, w2_path: &str) -> Result<SparseAutoencoder, Box<dyn Error>> {
    log::info!("loading weights from {} and {}", w1_path, w2_path);
    let w1 = read_csv_matrix(w1_path, config.hidden_size, config.visible_size)?;
    let w2 = read_csv_matrix(w2_path, config.visible_size, config.hidden_size)?;
    Ok(SparseAutoencoder::from_weights(config, w1, w2)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_worker_threads() {
        assert!(parse_worker_threads("").unwrap().is_none());
        assert!(parse_worker_threads("0").unwrap().is_none());
        assert_eq!(parse_worker_threads("all").unwrap().unwrap().worker_threads, None);
        assert_eq!(parse_worker_threads(" 4 ").unwrap().unwrap().worker_threads, Some(4));
        assert!(parse_worker_threads("four").is_err());
        assert!(parse_worker_threads("-1").is_err());
    }

}

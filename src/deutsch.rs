use qubit_sim::{
    algorithms::{ self, Verdict },
    error::StateError,
    gate::Oracle,
};
use rand::{ rngs::StdRng, SeedableRng };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt, EnvFilter };

fn init() -> StdRng {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    let seed: Option<u64>
        = std::env::var("QUBIT_SIM_SEED").ok().and_then(|s| s.parse().ok());
    seed.map(StdRng::seed_from_u64).unwrap_or_else(StdRng::from_entropy)
}

// oracles named on the command line, or all of them
fn oracles() -> Result<Vec<Oracle>, StateError> {
    let named: Vec<String> = std::env::args().skip(1).collect();
    if named.is_empty() {
        Ok(Oracle::ALL.to_vec())
    } else {
        named.iter().map(|s| s.parse::<Oracle>()).collect()
    }
}

fn main() -> Result<(), StateError> {
    let mut rng = init();
    for oracle in oracles()? {
        let bit = algorithms::deutsch(oracle, &mut rng)?;
        let verdict = Verdict::from(bit);
        tracing::info!("U_{}: measured {} => {:?}", oracle, bit, verdict);
        if (verdict == Verdict::Constant) != oracle.is_constant() {
            tracing::warn!("U_{} was misclassified", oracle);
        }
    }
    Ok(())
}

use qubit_sim::{ algorithms, error::StateError };
use rand::{ rngs::StdRng, SeedableRng };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt, EnvFilter };

const TRIALS: usize = 1000;

fn init() -> StdRng {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    let seed: Option<u64>
        = std::env::var("QUBIT_SIM_SEED").ok().and_then(|s| s.parse().ok());
    seed.map(StdRng::seed_from_u64).unwrap_or_else(StdRng::from_entropy)
}

fn main() -> Result<(), StateError> {
    let mut rng = init();

    let pair = algorithms::bell_pair(&mut rng)?;
    tracing::info!("prepared {}", pair);
    tracing::debug!("circuit: {}", pair.circuit());

    let mut counts = [[0_usize; 2]; 2];
    for _ in 0..TRIALS {
        let (m1, m2) = algorithms::bell_measurement(&mut rng)?;
        counts[u8::from(m1) as usize][u8::from(m2) as usize] += 1;
    }
    for (a, row) in counts.iter().enumerate() {
        for (b, count) in row.iter().enumerate() {
            tracing::info!("∣{}{}⟩: {} / {}", a, b, count, TRIALS);
        }
    }
    let agree = counts[0][0] + counts[1][1];
    tracing::info!("qubits agreed in {} of {} trials", agree, TRIALS);
    Ok(())
}

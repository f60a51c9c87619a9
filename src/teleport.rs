use qubit_sim::{ algorithms, error::StateError, state::QuantumState };
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

fn main() -> Result<(), StateError> {
    let mut rng = init();

    let input = QuantumState::random(1, &mut rng)?;
    let [a, b] = [input.vector()[0], input.vector()[1]];
    tracing::info!("sending {}", input);

    let out = algorithms::teleport(input, &mut rng)?;
    tracing::debug!("circuit: {}", out.state.circuit());
    tracing::info!("measured m1 = {}, m2 = {}", out.m1, out.m2);

    let [ra, rb] = out.received();
    tracing::info!("received ({})∣0⟩ + ({})∣1⟩", ra, rb);
    let fidelity = (a.conj() * ra + b.conj() * rb).norm_sqr();
    tracing::info!("fidelity: {:.12}", fidelity);
    Ok(())
}

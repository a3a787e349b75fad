//! Bullet pooling demo
//!
//! Runs a turret through a few volleys on a virtual 60 Hz clock: an initial
//! burst that outgrows its pool, a staggered volley using delayed spawns, a
//! shrink once the range is clear, and a final teardown.
//!
//! Pool sizes come from `config/pools.toml` or the path given as the first
//! argument.

use actor_pool::foundation::logging;
use actor_pool::prelude::*;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);
const RANGE: f32 = 30.0;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("pool request failed: {0}")]
    Pool(#[from] PoolError),

    #[error("bad pool configuration: {0}")]
    Config(#[from] actor_pool::config::ConfigError),
}

#[derive(Clone)]
struct Bullet {
    damage: u32,
    velocity: Vec3,
    travelled: f32,
}

impl Bullet {
    fn new(damage: u32) -> Self {
        Self {
            damage,
            velocity: Vec3::zeros(),
            travelled: 0.0,
        }
    }
}

impl Actor for Bullet {
    fn initialize_actor(&mut self) {
        self.velocity = Vec3::new(0.0, 0.0, -60.0);
        self.travelled = 0.0;
    }

    fn reset_actor(&mut self) {
        self.velocity = Vec3::zeros();
    }
}

#[derive(Clone, Default)]
struct MuzzleFlash;

impl Actor for MuzzleFlash {
    fn initialize_actor(&mut self) {}
    fn reset_actor(&mut self) {}
}

struct Turret {
    manager: PoolManager,
    clock: VirtualClock,
    in_flight: Vec<ActorHandle<Bullet>>,
    hits: u32,
}

impl Turret {
    fn new(config: &PoolingConfig) -> Result<Self, DemoError> {
        let (mut manager, clock) = PoolManager::with_virtual_clock();
        manager.create_pool_from_config("Bullet", Bullet::new(12), config)?;
        manager.create_pool_from_config("Muzzle Flash", MuzzleFlash, config)?;

        Ok(Self {
            manager,
            clock,
            in_flight: Vec::new(),
            hits: 0,
        })
    }

    fn fire(&mut self, muzzle: Vec3, delay: f32) -> Result<(), DemoError> {
        let bullet = self
            .manager
            .spawn_from_pool_delayed::<Bullet>("Bullet", muzzle, Quat::identity(), delay)?;
        let flash = self
            .manager
            .spawn_from_pool::<MuzzleFlash>("Muzzle Flash", muzzle, Quat::identity())?;

        // Flashes only live for the frame they are drawn in
        self.manager.release_to_pool("Muzzle Flash", flash)?;
        self.in_flight.push(bullet);
        Ok(())
    }

    fn step(&mut self) -> Result<(), DemoError> {
        self.clock.advance(FRAME);
        self.manager.update();

        let dt = FRAME.as_secs_f32();
        let mut spent = Vec::new();
        for &handle in &self.in_flight {
            let instance = self.manager.actor_mut("Bullet", handle)?;
            if !instance.is_active() {
                continue;
            }

            let bullet = instance.actor_mut();
            bullet.travelled += bullet.velocity.norm() * dt;
            if bullet.travelled >= RANGE {
                self.hits += bullet.damage;
                spent.push(handle);
            }
        }

        self.in_flight.retain(|handle| !spent.contains(handle));
        for handle in spent {
            self.manager.release_to_pool("Bullet", handle)?;
        }
        Ok(())
    }

    fn run_until_clear(&mut self) -> Result<u32, DemoError> {
        let mut frames = 0;
        while !self.in_flight.is_empty() {
            self.step()?;
            frames += 1;
        }
        Ok(frames)
    }

    fn report(&self, label: &str) {
        log::info!(
            "{}: {} pooled, {} active, {} pending, t = {:.2}s",
            label,
            self.manager.pooled_count("Bullet").unwrap_or(0),
            self.manager.active_count("Bullet").unwrap_or(0),
            self.manager.pending_activations(),
            self.manager.now().as_secs_f32()
        );
    }
}

fn load_config() -> Result<PoolingConfig, DemoError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/config/pools.toml").to_string());

    let config = match PoolingConfig::load_from_file(&path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Could not load {}: {}; using default pool sizes", path, err);
            PoolingConfig::default()
        }
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), DemoError> {
    logging::init_with_default("info");
    log::info!("Starting bullet pooling demo");

    let config = load_config()?;
    let mut turret = Turret::new(&config)?;
    turret.report("Pools ready");

    // Burst of eleven grows the ten-bullet pool by one
    for lane in 0..11u8 {
        turret.fire(Vec3::new(f32::from(lane) - 5.0, 0.0, 0.0), 0.0)?;
    }
    turret.report("Burst fired");
    let frames = turret.run_until_clear()?;
    turret.report(&format!("Burst cleared after {frames} frames"));

    // Staggered volley: each barrel waits a quarter second longer
    for barrel in 0..4u8 {
        turret.fire(Vec3::new(0.0, 1.0, 0.0), 0.25 * f32::from(barrel))?;
    }
    turret.report("Volley queued");
    let frames = turret.run_until_clear()?;
    turret.report(&format!("Volley cleared after {frames} frames"));

    turret.manager.adjust_pool_size::<Bullet>("Bullet", 5)?;
    turret.report("Pool trimmed");

    let stats = turret.manager.stats().clone();
    let bullets = turret.manager.pool::<Bullet>("Bullet")?.stats().clone();
    turret.manager.dispose_all_pools();

    log::info!(
        "Done: {} spawned, {} released, {} deferred, {} damage dealt",
        stats.total_spawned,
        stats.total_released,
        stats.deferred_fired,
        turret.hits
    );
    log::info!(
        "Bullet pool served {} checkouts ({} grown), built {}, destroyed {}",
        bullets.checkouts(),
        bullets.grown,
        bullets.created,
        bullets.destroyed
    );
    Ok(())
}

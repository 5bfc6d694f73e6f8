//! Headless симуляция танкового боя
//!
//! Запускает Bevy App без рендера: один танк, цель на орбите, 4 точки патруля.
//! Цель отстреливается, пока танк не взорвётся.
//!
//! Использование: `tank_simulation [seed] [config.json]`

use std::error::Error;

use bevy::prelude::*;
use tank_simulation::{
    create_stepped_app, CannonFired, ShellHit, Tank, TankBrain, TankConfig, TankDestroyed,
    TankSimSet, TankTarget, WanderPoint,
};

/// Сколько тиков гоняем (60 Hz → 40 секунд)
const TICKS: u32 = 2400;
/// Радиус орбиты цели вокруг центра арены
const ORBIT_RADIUS: f32 = 450.0;
/// Угловая скорость цели (rad/sec)
const ORBIT_SPEED: f32 = 0.15;
/// Цель стреляет в ответ раз в N секунд
const RETURN_FIRE_PERIOD: f32 = 2.0;
const RETURN_FIRE_DAMAGE: i32 = 10;

/// Счётчики для итогового отчёта
#[derive(Resource, Default)]
struct BattleStats {
    shots: u32,
    explosions: u32,
}

/// Часы цели (орбита + ответный огонь)
#[derive(Resource, Default)]
struct TargetClock {
    angle: f32,
    since_shot: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 42,
    };
    let config = match args.next() {
        Some(path) => TankConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => TankConfig::default(),
    };

    println!("Starting tank headless simulation (seed: {})", seed);

    let mut app = create_stepped_app(seed);
    app.init_resource::<BattleStats>()
        .init_resource::<TargetClock>()
        .add_systems(
            FixedUpdate,
            (move_target, return_fire).before(TankSimSet::DamageIntake),
        )
        .add_systems(FixedUpdate, count_battle_events.after(TankSimSet::Effects));

    for point in [
        Vec3::new(600.0, 0.0, 600.0),
        Vec3::new(-600.0, 0.0, 600.0),
        Vec3::new(-600.0, 0.0, -600.0),
        Vec3::new(600.0, 0.0, -600.0),
    ] {
        app.world_mut()
            .spawn((WanderPoint, Transform::from_translation(point)));
    }

    app.world_mut().spawn((
        TankTarget,
        Transform::from_xyz(ORBIT_RADIUS, 0.0, 0.0),
    ));

    let tank = app
        .world_mut()
        .spawn((Tank, config, Transform::from_xyz(-200.0, 0.0, -200.0)))
        .id();

    for tick in 0..TICKS {
        app.update();

        if tick % 300 == 0 {
            match app.world().get::<TankBrain>(tank) {
                Some(brain) => println!("Tick {}: tank in {:?}", tick, brain.mode),
                None => println!("Tick {}: tank removed", tick),
            }
        }
    }

    let stats = app.world().resource::<BattleStats>();
    println!(
        "Simulation complete! shots: {}, explosions: {}",
        stats.shots, stats.explosions
    );

    Ok(())
}

/// Цель движется по окружности вокруг центра арены
fn move_target(
    mut clock: ResMut<TargetClock>,
    mut targets: Query<&mut Transform, With<TankTarget>>,
    time: Res<Time<Fixed>>,
) {
    clock.angle += ORBIT_SPEED * time.delta_secs();
    for mut transform in targets.iter_mut() {
        transform.translation =
            Vec3::new(clock.angle.cos(), 0.0, clock.angle.sin()) * ORBIT_RADIUS;
    }
}

/// Цель отстреливается по всем танкам
fn return_fire(
    mut clock: ResMut<TargetClock>,
    tanks: Query<Entity, With<Tank>>,
    mut hits: EventWriter<ShellHit>,
    time: Res<Time<Fixed>>,
) {
    clock.since_shot += time.delta_secs();
    if clock.since_shot < RETURN_FIRE_PERIOD {
        return;
    }
    clock.since_shot = 0.0;

    for tank in tanks.iter() {
        hits.write(ShellHit {
            shooter: None,
            target: tank,
            damage: RETURN_FIRE_DAMAGE,
        });
    }
}

fn count_battle_events(
    mut stats: ResMut<BattleStats>,
    mut fired: EventReader<CannonFired>,
    mut destroyed: EventReader<TankDestroyed>,
) {
    for event in fired.read() {
        stats.shots += 1;
        println!("💥 Tank {:?} fired from {:?}", event.tank, event.muzzle.translation);
    }
    for event in destroyed.read() {
        stats.explosions += 1;
        println!("🔥 Tank {:?} destroyed at {:?}", event.tank, event.origin.translation);
    }
}

use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use marquee_core::carousel::CarouselOptions;
use marquee_core::config::CarouselConfig;
use marquee_core::timing::earliest;
use marquee_core::{
    CarouselController, Clock, ManualClock, Mounted, Navigation, Origin, Outcome, Timestamp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    Navigate(Navigation),
    Hold,
    Release,
}

/// Scripted user input, `AT:ACTION`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UserEvent {
    at: Timestamp,
    action: UserAction,
}

impl FromStr for UserEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (at, action) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("Expected AT:ACTION, got '{}'", s))?;
        let at: u64 = at
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid time '{}' in '{}'", at, s))?;

        let action = match action.trim() {
            "next" => UserAction::Navigate(Navigation::Next),
            "prev" => UserAction::Navigate(Navigation::Prev),
            "hold" => UserAction::Hold,
            "release" => UserAction::Release,
            other => match other.strip_prefix("goto=") {
                Some(index) => UserAction::Navigate(Navigation::Goto(
                    index
                        .parse()
                        .map_err(|_| anyhow!("Invalid goto index '{}'", index))?,
                )),
                None => bail!("Unknown action '{}' (next, prev, goto=N, hold, release)", other),
            },
        };

        Ok(Self {
            at: Duration::from_millis(at),
            action,
        })
    }
}

fn ms(t: Timestamp) -> u128 {
    t.as_millis()
}

/// Run a carousel for `duration_ms` and print every index change
pub fn carousel(items: usize, config: &CarouselConfig, duration_ms: u64, user: &[String]) -> Result<()> {
    let mut events = user
        .iter()
        .map(|s| s.parse::<UserEvent>())
        .collect::<Result<Vec<_>>>()?;
    events.sort_by_key(|e| e.at);

    let clock = ManualClock::new();
    let end = Duration::from_millis(duration_ms);
    let mut carousel = Mounted::new(CarouselController::new(
        items,
        CarouselOptions::from(config),
        clock.now(),
    )?);

    println!(
        "Carousel: {} items, period {}ms, transition {}ms, idle {}ms, auto-advance {}",
        items,
        config.period_ms,
        config.transition_ms,
        config.idle_resume_ms,
        if carousel.options().auto_advance { "on" } else { "off" }
    );
    println!("{:>8}  index 0", "0ms");

    for line in timeline(&clock, &mut carousel, &events, end) {
        println!("{}", line);
    }

    println!(
        "{:>8}  final index {}",
        format!("{}ms", ms(end)),
        carousel.current_index()
    );
    Ok(())
}

/// Step the controller from deadline to deadline, interleaving user input
fn timeline(
    clock: &ManualClock,
    carousel: &mut CarouselController,
    events: &[UserEvent],
    end: Timestamp,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = events.iter().peekable();

    loop {
        let next_user = pending.peek().map(|e| e.at);
        let Some(at) = earliest(&[next_user, carousel.next_deadline()]) else {
            break;
        };
        if at > end {
            break;
        }
        clock.set(at);
        let now = clock.now();
        let stamp = format!("{}ms", ms(now));

        let before = carousel.current_index();
        let was_user_controlled = carousel.is_user_controlled();
        if carousel.tick(now) {
            lines.push(format!(
                "{:>8}  auto     {} -> {}",
                stamp,
                before,
                carousel.current_index()
            ));
        }
        if was_user_controlled && !carousel.is_user_controlled() {
            lines.push(format!("{:>8}  resumed  auto-advance", stamp));
        }

        if next_user == Some(at) {
            let Some(event) = pending.next() else {
                break;
            };
            lines.push(apply(carousel, event, &stamp));
        }
    }
    lines
}

fn apply(carousel: &mut CarouselController, event: &UserEvent, stamp: &str) -> String {
    match event.action {
        UserAction::Navigate(nav) => match carousel.navigate(nav, Origin::User, event.at) {
            Ok(Outcome::Moved { from, to }) => {
                format!("{:>8}  user     {} -> {} ({:?})", stamp, from, to, nav)
            }
            Ok(Outcome::Dropped) => format!("{:>8}  user     {:?} dropped (transitioning)", stamp, nav),
            Ok(Outcome::Disposed) => format!("{:>8}  user     {:?} ignored (disposed)", stamp, nav),
            Err(e) => format!("{:>8}  user     {:?} rejected: {}", stamp, nav, e),
        },
        UserAction::Hold => {
            carousel.hold();
            format!("{:>8}  hold", stamp)
        }
        UserAction::Release => {
            carousel.release(event.at);
            format!("{:>8}  release", stamp)
        }
    }
}

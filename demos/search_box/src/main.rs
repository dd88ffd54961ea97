//! Simulated typing into a debounced search field.
//!
//! Usage: `search-box [delay_ms] [keystroke_gap_ms] [text]`

use anyhow::Context;
use linger_core::{Composition, Signal, TimerQueue, signal};
use linger_hooks::*;
use std::cell::RefCell;
use std::rc::Rc;
use web_time::Duration;

struct Settings {
    delay: Delay,
    keystroke_gap: Duration,
    text: String,
}

fn settings() -> anyhow::Result<Settings> {
    let mut args = std::env::args().skip(1);
    let delay = match args.next() {
        Some(raw) => {
            let ms: i64 = raw.parse().with_context(|| format!("bad delay '{raw}'"))?;
            Delay::try_from(ms)?
        }
        None => Delay::from_millis(300),
    };
    let keystroke_gap = match args.next() {
        Some(raw) => {
            let ms: i64 = raw.parse().with_context(|| format!("bad keystroke gap '{raw}'"))?;
            Delay::try_from(ms)?.as_duration()
        }
        None => Duration::from_millis(120),
    };
    let text = args.next().unwrap_or_else(|| "linger".to_string());
    Ok(Settings {
        delay,
        keystroke_gap,
        text,
    })
}

#[allow(non_snake_case)]
fn SearchBox(
    timers: &TimerQueue,
    query: &Signal<String>,
    delay: Delay,
    results: &Rc<RefCell<Vec<String>>>,
) -> Result<(), DelayError> {
    let q = query.get();
    let typing = remember_toggle(false);

    if let Some(prev) = remember_previous(q.clone()) {
        log::debug!("query: '{prev}' -> '{q}'");
    }

    update_effect(q.clone(), {
        let typing = typing.clone();
        move || {
            typing.set(true);
            None
        }
    });

    debounced_effect(timers, q.clone(), delay, {
        let results = results.clone();
        move || {
            typing.set(false);
            log::info!("searching for '{q}'");
            results.borrow_mut().push(capitalize(&q));
        }
    })?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let Settings {
        delay,
        keystroke_gap,
        text,
    } = settings()?;
    log::info!(
        "debounce {} ms, keystroke every {:?}, typing '{text}'",
        delay.as_millis(),
        keystroke_gap
    );

    let timers = TimerQueue::system();
    let query = signal(String::new());
    let results = Rc::new(RefCell::new(Vec::new()));
    let search_box = Composition::new();

    let mut typed = String::new();
    for ch in text.chars() {
        typed.push(ch);
        query.set(typed.clone());
        search_box.compose(|| SearchBox(&timers, &query, delay, &results))?;

        std::thread::sleep(keystroke_gap);
        timers.run_due();
    }

    // Idle until the last debounce window closes.
    while let Some(wait) = timers.time_until_next() {
        std::thread::sleep(wait);
        timers.run_due();
    }
    search_box.dispose();

    let results = results.borrow();
    println!("{} search(es): {:?}", results.len(), *results);
    Ok(())
}

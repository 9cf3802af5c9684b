//! expando binary: run the expansion engine over stdin
//!
//! Each stdin line is fed into a flat surface keystroke by keystroke, with
//! the boundary trigger policy active, and the final surface value is
//! printed. `--watch` reloads the abbreviation file when it changes between
//! lines, exercising the push-based refresh path end to end.

use std::io::{self, BufRead, Write as _};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use expando::cli::CliArgs;
use expando::config_watcher::ConfigWatcher;
use expando::engine::{Engine, INPUT_COALESCE_WINDOW};
use expando::host::{Document, HostEvent};
use expando::store::ConfigStore;
use expando::{config_paths, FileStore, SitePolicy, SurfaceRegistry};

fn main() -> Result<()> {
    expando::tracing::init();
    let args = CliArgs::parse();

    let config_path = args
        .config
        .clone()
        .or_else(config_paths::abbreviations_file)
        .ok_or_else(|| anyhow!("no config path available; pass --config"))?;
    let store = Rc::new(FileStore::new(config_path.clone(), config_paths::usage_file()));

    if args.stats {
        for entry in store.usage_stats() {
            println!("{:6}  {} -> {}", entry.count, entry.trigger, entry.expansion);
        }
        return Ok(());
    }
    if args.clear_stats {
        store.clear_stats();
        println!("Usage statistics cleared");
        return Ok(());
    }

    let (policy, composers) = SitePolicy::load(config_paths::sites_file().as_deref());
    let registry = SurfaceRegistry::new(composers);
    let mut engine = Engine::new(store, policy, registry);
    engine
        .reload()
        .with_context(|| format!("loading {}", config_path.display()))?;

    if args.list {
        for (trigger, template) in engine.snapshot().abbreviations.iter() {
            println!("{} -> {}", trigger, template.replace('\n', "\\n"));
        }
        return Ok(());
    }

    let watcher = if args.watch {
        match ConfigWatcher::new(config_path) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!("Config watching unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    // One flat surface stands in for the page
    let mut doc = Document::new("stdin");
    let field = doc.create_textarea();
    doc.append(doc.root(), field);
    engine.scan(&mut doc);

    // Virtual clock: step past the coalescing window per keystroke so every
    // input event gets its own boundary pass
    let step = INPUT_COALESCE_WINDOW + Duration::from_millis(1);
    let mut now = Instant::now();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;

        if let Some(watcher) = &watcher {
            if watcher.reload_due() {
                if let Err(e) = engine.reload() {
                    tracing::warn!("Reload failed, keeping last snapshot: {:#}", e);
                }
            }
        }

        doc.flat_state_mut(field)
            .context("surface vanished")?
            .set("", 0);
        for ch in line.chars() {
            let state = doc.flat_state_mut(field).context("surface vanished")?;
            let caret = state.selection_start;
            let mut text = state.text();
            let byte = expando::util::char_to_byte(&text, caret);
            text.insert(byte, ch);
            state.set(&text, caret + 1);

            engine.handle_event(&mut doc, field, HostEvent::Input, now);
            now += step;
            engine.tick(&mut doc, now);
        }

        let final_text = doc.flat_state(field).context("surface vanished")?.text();
        writeln!(stdout, "{}", final_text)?;
        doc.drain_outbox();
    }

    Ok(())
}

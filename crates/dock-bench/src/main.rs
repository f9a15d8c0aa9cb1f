use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;

use term_dock::layout::{DockRect, arrange, resize_split};
use term_dock::model::{LayoutOptions, NodeId, NodeKind, PaneKind};
use term_dock::scenario::{PreviewLayout, Scenario, add_anchorable};

const AREA: DockRect = DockRect::new(0.0, 0.0, 1600.0, 900.0);
const MAX_CONTENTS: usize = 48;

#[derive(Parser, Debug)]
#[command(
    name = "dock-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Random dock/float/hide/close sequences with invariant checks after every step"
)]
struct BenchCli {
    /// Number of transitions to run.
    #[arg(short = 'n', long = "steps", value_name = "COUNT", default_value_t = 10_000)]
    steps: u64,

    /// Seed for the transition sequence. Defaults to the clock.
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    seed: Option<u64>,

    /// Arrange the tree every this many steps.
    #[arg(long = "arrange-every", value_name = "STEPS", default_value_t = 8)]
    arrange_every: u64,
}

struct BenchConfig {
    steps: u64,
    seed: u64,
    arrange_every: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if cli.steps == 0 {
            return Err("steps must be at least 1".to_string());
        }
        if cli.arrange_every == 0 {
            return Err("arrange-every must be at least 1".to_string());
        }
        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
                ^ 0xA5A5_A5A5_1234_5678
        });
        Ok(Self {
            steps: cli.steps,
            seed,
            arrange_every: cli.arrange_every,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_bench(&config).map_err(|failure| {
        io::Error::other(format!(
            "invariant broken at step {} (seed {}): {}\n{}",
            failure.step, config.seed, failure.reason, failure.dump
        ))
    })?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

struct Failure {
    step: u64,
    reason: String,
    dump: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Float,
    Dock,
    Hide,
    Show,
    ToggleAutoHide,
    Close,
    DockAsDocument,
    NewDocument,
    NewAnchorable,
    Activate,
    Resize,
}

const OPS: [Op; 11] = [
    Op::Float,
    Op::Dock,
    Op::Hide,
    Op::Show,
    Op::ToggleAutoHide,
    Op::Close,
    Op::DockAsDocument,
    Op::NewDocument,
    Op::NewAnchorable,
    Op::Activate,
    Op::Resize,
];

fn run_bench(config: &BenchConfig) -> Result<BenchStats, Failure> {
    let mut layout = Scenario::Ide
        .build(LayoutOptions::default())
        .map_err(|err| Failure {
            step: 0,
            reason: err.to_string(),
            dump: String::new(),
        })?;
    let mut rng = XorShift::new(config.seed);
    let mut stats = BenchStats::new();
    let mut created = 0usize;

    for step in 0..config.steps {
        let op = OPS[rng.below(OPS.len())];
        let started = Instant::now();
        let outcome = apply(&mut layout, op, &mut rng, &mut created);
        stats.record(op, outcome, started.elapsed());

        if step % config.arrange_every == 0 {
            arrange(&mut layout, AREA);
        }
        check_invariants(&mut layout).map_err(|reason| Failure {
            step,
            reason,
            dump: layout.dump(),
        })?;
        stats.events += layout.take_events().len() as u64;
        layout.take_dirty();
    }
    stats.final_nodes = layout.node_count();
    stats.final_contents = layout.contents().len();
    stats.mark_completed();
    Ok(stats)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Changed,
    Unchanged,
    Rejected,
}

fn pick(rng: &mut XorShift, ids: &[NodeId]) -> Option<NodeId> {
    (!ids.is_empty()).then(|| ids[rng.below(ids.len())])
}

fn apply(layout: &mut PreviewLayout, op: Op, rng: &mut XorShift, created: &mut usize) -> Outcome {
    let contents = layout.contents();
    let anchorables = layout.anchorables();
    let target = match op {
        Op::Hide | Op::ToggleAutoHide => pick(rng, &anchorables),
        Op::Show => pick(rng, &layout.hidden_anchorables()),
        _ => pick(rng, &contents),
    };

    let result = match (op, target) {
        (Op::Float, Some(id)) => layout.float(id).map(|window| window.is_some()),
        (Op::Dock, Some(id)) => layout.dock(id).map(|_| true),
        (Op::Hide, Some(id)) => layout.hide(id),
        (Op::Show, Some(id)) => layout.show(id),
        (Op::ToggleAutoHide, Some(id)) => layout.toggle_auto_hide(id),
        (Op::Close, Some(id)) => layout.close(id),
        (Op::DockAsDocument, Some(id)) => layout.dock_as_document(id),
        (Op::Activate, Some(id)) => layout.activate(id).map(|_| true),
        (Op::NewDocument, _) if contents.len() < MAX_CONTENTS => {
            *created += 1;
            let doc = layout.new_document(format!("doc-{created}"));
            layout.dock(doc).map(|_| true)
        }
        (Op::NewAnchorable, _) if contents.len() < MAX_CONTENTS => {
            *created += 1;
            let pane = layout
                .nodes_of_kind(NodeKind::Pane(PaneKind::Anchorable))
                .first()
                .copied();
            match pane {
                Some(pane) => add_anchorable(layout, pane, &format!("tool-{created}")).map(|_| true),
                None => {
                    let tool = layout.new_anchorable(format!("tool-{created}"));
                    layout.dock(tool).map(|_| true)
                }
            }
        }
        (Op::Resize, _) => {
            let groups: Vec<NodeId> = layout
                .rooted_nodes()
                .filter(|id| layout.visible_positionable_children(*id).len() > 1)
                .collect();
            match pick(rng, &groups) {
                Some(group) => {
                    let gaps = layout.visible_positionable_children(group).len() - 1;
                    let delta = rng.below(201) as f64 - 100.0;
                    resize_split(layout, group, rng.below(gaps), delta)
                }
                None => Ok(false),
            }
        }
        _ => Ok(false),
    };
    match result {
        Ok(true) => Outcome::Changed,
        Ok(false) => Outcome::Unchanged,
        Err(err) => {
            tracing::trace!(?op, %err, "transition rejected");
            Outcome::Rejected
        }
    }
}

/// Every transition already collected garbage, so another pass must be a
/// no-op, and every empty pane left must be the last main document pane or a
/// restore target.
fn check_invariants(layout: &mut PreviewLayout) -> Result<(), String> {
    let before = layout.dump();
    layout.collect_garbage();
    if layout.dump() != before {
        return Err("garbage collection was not idempotent".to_string());
    }

    let targets: Vec<NodeId> = layout
        .rooted_nodes()
        .filter_map(|id| layout.previous_container(id))
        .map(|previous| previous.container)
        .collect();
    let main_doc_panes = layout.main_document_panes();
    for id in layout.rooted_nodes() {
        let Some(kind) = layout.kind(id) else {
            continue;
        };
        if !layout.children(id).is_empty() || targets.contains(&id) {
            continue;
        }
        let orphan = match kind {
            NodeKind::Pane(_) => !(main_doc_panes.len() == 1 && main_doc_panes[0] == id),
            NodeKind::PaneGroup(_) | NodeKind::AnchorGroup | NodeKind::FloatingWindow(_) => true,
            NodeKind::Panel => Some(id) != layout.root_panel(),
            _ => false,
        };
        if orphan {
            return Err(format!("orphan empty {}", layout.describe(id)));
        }
    }
    if layout.root_panel().is_none() {
        return Err("root panel missing".to_string());
    }
    Ok(())
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    steps: u64,
    changed: u64,
    unchanged: u64,
    rejected: u64,
    events: u64,
    total_op_time: Duration,
    slowest_op: Duration,
    slowest_kind: Option<Op>,
    final_nodes: usize,
    final_contents: usize,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            steps: 0,
            changed: 0,
            unchanged: 0,
            rejected: 0,
            events: 0,
            total_op_time: Duration::ZERO,
            slowest_op: Duration::ZERO,
            slowest_kind: None,
            final_nodes: 0,
            final_contents: 0,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record(&mut self, op: Op, outcome: Outcome, time: Duration) {
        self.steps += 1;
        match outcome {
            Outcome::Changed => self.changed += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Rejected => self.rejected += 1,
        }
        self.total_op_time += time;
        if time > self.slowest_op {
            self.slowest_op = time;
            self.slowest_kind = Some(op);
        }
    }

    fn average_op_us(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.total_op_time.as_secs_f64() / self.steps as f64 * 1_000_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let steps_per_second = if elapsed > 0.0 {
            self.steps as f64 / elapsed
        } else {
            0.0
        };
        let slowest_kind = self
            .slowest_kind
            .map(|op| format!("{op:?}"))
            .unwrap_or_else(|| "-".to_string());

        indoc::formatdoc!(
            r#"
            Dock bench completed, all invariants held.
            Seed: {seed} | Steps: {steps} in {elapsed:.2}s (~{rate:.0}/s, arrange every {every})
            Changed: {changed} | Unchanged: {unchanged} | Rejected: {rejected} | Events: {events}
            Avg transition: {avg:.1} us | Slowest: {slowest:.1} us ({slowest_kind})
            Final tree: {nodes} nodes, {contents} contents
            "#,
            seed = config.seed,
            steps = self.steps,
            elapsed = elapsed,
            rate = steps_per_second,
            every = config.arrange_every,
            changed = self.changed,
            unchanged = self.unchanged,
            rejected = self.rejected,
            events = self.events,
            avg = self.average_op_us(),
            slowest = self.slowest_op.as_secs_f64() * 1_000_000.0,
            slowest_kind = slowest_kind,
            nodes = self.final_nodes,
            contents = self.final_contents,
        )
    }
}

/// xorshift64*; deterministic per seed so failures can be replayed.
struct XorShift {
    state: u64,
}

impl XorShift {
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_run_holds_invariants_and_drains_events() {
        let config = BenchConfig {
            steps: 300,
            seed: 7,
            arrange_every: 8,
        };
        let stats = run_bench(&config).unwrap_or_else(|failure| {
            panic!("step {}: {}\n{}", failure.step, failure.reason, failure.dump)
        });
        assert_eq!(stats.steps, 300);
        assert!(stats.events > 0);
        assert!(stats.final_report(&config).contains("Events: "));
    }

    #[test]
    fn zero_steps_are_rejected() {
        let cli = BenchCli::parse_from(["dock-bench", "--steps", "0"]);
        assert!(BenchConfig::try_from(&cli).is_err());
    }
}

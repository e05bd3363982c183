use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use echo_chat::core::message::MemoryInfo;
use echo_chat::core::sanitize::clean_memory_content;
use echo_chat::core::session::ChatState;
use echo_chat::ui::theme::Theme;
use echo_chat::ui::transcript::build_transcript_lines;
use echo_chat::utils::scroll::ScrollCalculator;

const REPLY: &str = "## Upcoming events\n\nThe **Science Society** meets every *Thursday*. \
Bring your `laptop` and see [the schedule](https://example.org/events).\n\n\
- Robotics workshop\n- Astronomy night\n- Quiz finals";

fn make_state(pairs: usize, show_memory: bool) -> ChatState {
    let mut state = ChatState {
        show_memory,
        ..ChatState::default()
    };
    for i in 0..pairs {
        state.log.append_user(format!("question number {i} about the society"));
        let memory = MemoryInfo::new(
            "**Human**: what events are coming up?\n**AI**: several workshops",
            Some(i as u64),
        );
        state.log.append_bot(REPLY, Some(memory));
    }
    state
}

fn bench_sanitize(c: &mut Criterion) {
    let noisy = format!(
        "<think>{}</think>\nthinking: internal\n\n\n{}\n[think]more[/think]",
        "reasoning ".repeat(200),
        REPLY
    );
    let mut group = c.benchmark_group("sanitize");
    group.throughput(Throughput::Bytes(noisy.len() as u64));
    group.bench_function("think_heavy", |b| b.iter(|| clean_memory_content(&noisy)));
    group.bench_function("clean_reply", |b| b.iter(|| clean_memory_content(REPLY)));
    group.finish();
}

fn bench_transcript(c: &mut Criterion) {
    let theme = Theme::dark_default();
    for &pairs in &[50usize, 200usize] {
        let mut group = c.benchmark_group(format!("transcript_pairs{pairs}"));
        group.throughput(Throughput::Elements(pairs as u64 * 2));
        for &show_memory in &[false, true] {
            let state = make_state(pairs, show_memory);
            group.bench_with_input(
                BenchmarkId::new("build_and_wrap", if show_memory { "memory" } else { "plain" }),
                &state,
                |b, state| {
                    b.iter(|| {
                        let lines = build_transcript_lines(state, &theme, true, 0);
                        ScrollCalculator::prewrap_lines(&lines, 100)
                    })
                },
            );
        }
        group.finish();
    }
}

criterion_group!(benches, bench_sanitize, bench_transcript);
criterion_main!(benches);

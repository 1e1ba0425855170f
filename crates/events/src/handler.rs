/// Execute an aggregate command deterministically (no IO, no async).
///
/// 1. **Decide**: `aggregate.handle(command)` returns events without mutating.
/// 2. **Evolve**: each event is applied in order via `aggregate.apply(event)`.
///
/// If `handle` fails nothing is applied. An empty event list leaves the
/// aggregate (and its version) untouched.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: stockledger_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}

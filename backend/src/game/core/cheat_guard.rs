/// True when more words were guessed than whole seconds have passed since the round started
pub fn is_cheating(round_started_at: u64, now: u64, guessed_so_far: usize) -> bool {
    let elapsed_secs = now.saturating_sub(round_started_at) / 1000;
    guessed_so_far as u64 > elapsed_secs
}

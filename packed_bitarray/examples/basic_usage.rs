use packed_bitarray::{BitArray, BitOp, CombineError, Nibble};

fn main() {
    println!("=== Packed Bit Array Examples ===\n");

    // Example 1: Whole-array set algebra
    example_set_algebra();

    // Example 2: Sliding a window over itself
    example_overlapping_ranges();

    // Example 3: Rejected requests
    let _ = example_errors();
}

fn render<W: packed_bitarray::Word>(bits: &BitArray<W>) -> String {
    bits.iter().map(|bit| if bit { '1' } else { '0' }).collect()
}

fn example_set_algebra() {
    println!("Example 1: Weekday schedules as 7-bit sets");

    let alice: BitArray<u8> = [true, true, false, true, false, false, false].into_iter().collect();
    let bob: BitArray<u8> = [false, true, true, true, false, true, false].into_iter().collect();

    let mut both = alice.clone();
    both &= &bob;
    let mut either = alice.clone();
    either |= &bob;
    let mut one = alice;
    one ^= &bob;

    println!("  Both:   {}", render(&both));
    println!("  Either: {}", render(&either));
    println!("  One:    {}", render(&one));
    println!("  Free:   {}", render(&!either));
    println!();
}

fn example_overlapping_ranges() {
    println!("Example 2: Smearing a pulse two bits to the right");

    let mut signal = BitArray::<Nibble>::with_len(12);
    signal.set(1, true);
    println!("  Before: {}", render(&signal));

    // Each bit ORs in the bit two places before it.
    signal.combine_within(BitOp::Or, 2.., ..10);
    println!("  After:  {}", render(&signal));

    signal.toggle_range(4..8);
    println!("  Toggle: {}", render(&signal));
    println!();
}

fn example_errors() -> Result<(), CombineError> {
    println!("Example 3: Contract violations are caught up front");

    let mut short = BitArray::<u64>::repeating(true, 10);
    let long = BitArray::<u64>::with_len(20);

    if let Err(err) = short.try_combine(BitOp::And, &long) {
        println!("  {}", err);
    }
    if let Err(err) = short.try_toggle_range(5..15) {
        println!("  {}", err);
    }
    short.try_combine_with_range(BitOp::And, 5..15, &long)?;
    println!("  Cleared: {}", render(&short));

    Ok(())
}

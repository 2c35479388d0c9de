use sbrkout_core::device::latch::AddressableLatch;

#[test]
fn test_single_bit_writes_hold_the_others() {
    let mut latch = AddressableLatch::new();
    assert!(!latch.write(3, true));
    assert!(!latch.write(7, true));
    assert_eq!(latch.outputs(), 0x88);
    assert!(latch.write(3, false));
    assert_eq!(latch.outputs(), 0x80);
    assert!(latch.q(7));
    assert!(!latch.q(3));
}

#[test]
fn test_bit_index_wraps_to_three_lines() {
    let mut latch = AddressableLatch::new();
    latch.write(9, true);
    assert!(latch.q(1));
}

#[test]
fn test_reset_clears_outputs() {
    let mut latch = AddressableLatch::new();
    for bit in 0..8 {
        latch.write(bit, true);
    }
    assert_eq!(latch.outputs(), 0xFF);
    latch.reset();
    assert_eq!(latch.outputs(), 0);
}

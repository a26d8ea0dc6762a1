//! Fuzz target for snapshot restore.
//!
//! Arbitrary bytes must either restore cleanly or fail without touching
//! the chip.

#![no_main]

use cia1_keyboard::{snapshot, Cia1Ports, Peripherals};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    let before = snapshot::save(&cia);

    match snapshot::restore(&mut cia, data, &mut host) {
        Ok(()) => {
            // A restored chip saves to a record that restores to itself
            let saved = snapshot::save(&cia);
            let mut again = Cia1Ports::default();
            snapshot::restore(&mut again, &saved, &mut host).unwrap();
            assert_eq!(snapshot::save(&again), saved);
            assert_eq!(host.pot_mask, again.pot_mask());
        }
        Err(_) => assert_eq!(snapshot::save(&cia), before),
    }
});

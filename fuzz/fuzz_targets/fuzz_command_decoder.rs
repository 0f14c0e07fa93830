//! Fuzz target: `codec::decode_command`
//!
//! Feeds arbitrary text into the inbound command decoder and checks that
//! it never panics and never yields more than one command per key.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use airsentry::app::commands::RemoteCommand;
use airsentry::protocol::codec::decode_command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(batch) = decode_command(text) {
        assert!(batch.len() <= 2);
        let fans = batch
            .iter()
            .filter(|c| matches!(c, RemoteCommand::SetFanSpeed(_)))
            .count();
        assert!(fans <= 1);
    }
});

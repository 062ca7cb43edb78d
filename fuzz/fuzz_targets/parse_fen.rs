#![no_main]
use chesspos::chess::position::Position;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(position) = Position::try_from(s) {
            assert!(position.is_consistent());
            let fen = position.fen();
            assert_eq!(Position::from_fen(&fen), Ok(position));
        }
    }
});

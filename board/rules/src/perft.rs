use crate::{MoveCode, Played, PositionId, Result, Sequence};

/// Count the leaves of the legal move tree `depth` plies below the given position
///
/// Moves are played onto the sequence and discarded again, so it is left as it was found. From
/// a position that can't be extended, each move is counted in its own continuation instead.
pub fn perft(sequence: &mut Sequence, id: PositionId, depth: u32) -> Result<u64> {
    match depth {
        0 => return Ok(1),
        1 => return Ok(sequence.moves(id).len() as u64),
        _ => {}
    }
    let codes: Vec<MoveCode> = sequence.moves(id).iter().collect();
    let mut nodes = 0;
    for code in codes {
        nodes += perft_after(sequence, id, code, depth - 1)?;
    }
    Ok(nodes)
}

/// [`perft`] split up by the first move
pub fn perft_divide(
    sequence: &mut Sequence,
    id: PositionId,
    depth: u32,
) -> Result<Vec<(MoveCode, u64)>> {
    if depth == 0 {
        return Ok(Vec::new());
    }
    let codes: Vec<MoveCode> = sequence.moves(id).iter().collect();
    let mut divided = Vec::with_capacity(codes.len());
    for code in codes {
        divided.push((code, perft_after(sequence, id, code, depth - 1)?));
    }
    Ok(divided)
}

fn perft_after(sequence: &mut Sequence, id: PositionId, code: MoveCode, depth: u32) -> Result<u64> {
    match sequence.make_move(id, code)? {
        Played::Appended(next) => {
            let nodes = perft(sequence, next, depth)?;
            sequence.discard(next)?;
            Ok(nodes)
        }
        Played::Continued(mut continuation, next) => perft(&mut continuation, next, depth),
    }
}

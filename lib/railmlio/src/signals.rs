use log::*;
use topology::{Signal, SignalDirection, SignalFunction, SignalKind, Topology};

use crate::model::*;
use crate::topo::{ExportError, Strictness};

/// Interlocking function of a signal. The kind wins over the function for
/// distant and barrage signals; combinations without a railML counterpart
/// get no function.
pub fn signal_function(kind :SignalKind, function :SignalFunction) -> Option<SignalFunctionIL> {
    match (kind, function) {
        (SignalKind::Distant, _) => Some(SignalFunctionIL::Distant),
        (SignalKind::Barrage, _) => Some(SignalFunctionIL::Barrage),
        (_, SignalFunction::Exit) => Some(SignalFunctionIL::Exit),
        (_, SignalFunction::Entry) => Some(SignalFunctionIL::Entry),
        (_, SignalFunction::Block) => Some(SignalFunctionIL::Block),
        _ => None,
    }
}

pub fn application_direction(direction :SignalDirection) -> ApplicationDirection {
    match direction {
        SignalDirection::In => ApplicationDirection::Normal,
        SignalDirection::Reverse => ApplicationDirection::Reverse,
    }
}

/// Distance along the edge as a fraction of the edge's length.
pub fn relative_position(topo :&Topology, signal :&Signal) -> Result<f64, ExportError> {
    let length = topo.edge_length(&signal.edge)?;
    Ok(signal.distance_edge / length)
}

/// Positions outside [0,1] pass only when lenient. A non-finite position
/// (zero-length edge) has no xs:double form and is always rejected.
pub fn check_position(signal :&Signal, pos :f64, strictness :Strictness) -> Result<f64, ExportError> {
    if pos >= 0.0 && pos <= 1.0 {
        return Ok(pos);
    }
    if !pos.is_finite() || strictness == Strictness::Strict {
        return Err(ExportError::InvalidSignalPosition { signal: signal.id.clone(), pos });
    }
    warn!("Signal {} lies outside its edge {} (pos {}).", signal.id, signal.edge, pos);
    Ok(pos)
}

pub fn signal_is(signal :&Signal, spot :SpotLocation) -> SignalIS {
    SignalIS {
        id: signal.id.clone(),
        is_switchable: true,
        spot_location: spot,
        name: signal.name.as_ref().filter(|n| !n.is_empty()).map(|n| Name::en(n.as_str())),
    }
}

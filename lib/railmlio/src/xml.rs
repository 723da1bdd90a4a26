use std::path::Path;
use log::*;
use minidom::{Element, ElementBuilder};

use crate::model::*;

pub const XSI :&str = "http://www.w3.org/2001/XMLSchema-instance";

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("xml error: {0}")]
    Xml(#[from] minidom::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn write_railml(doc :&RailML) -> Result<String, WriteError> {
    let root = to_element(doc);
    let mut buf = Vec::new();
    root.write_to_decl(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

pub fn write_railml_to_file(doc :&RailML, path :impl AsRef<Path>) -> Result<(), WriteError> {
    let text = write_railml(doc)?;
    std::fs::write(path.as_ref(), text)?;
    info!("Wrote railML {} to {}", doc.version.as_str(), path.as_ref().display());
    Ok(())
}

/// The whole document as one element tree, every element in the railML
/// namespace of the document's version.
pub fn to_element(doc :&RailML) -> Element {
    let w = Writer { ns: doc.version.namespace() };
    let mut root = w.el("railML")
        .attr("version", doc.version.as_str())
        .attr("xmlns:xsi", XSI)
        .attr("xsi:schemaLocation", doc.version.schema_location())
        .append(w.infrastructure(&doc.infrastructure));
    if let Some(il) = &doc.interlocking {
        root = root.append(w.interlocking(il));
    }
    root.build()
}

fn num(x :f64) -> String { format!("{}", x) }

fn pos(ab :AB) -> String { num(ab.intrinsic()) }

struct Writer {
    ns :String,
}

impl Writer {
    fn el(&self, name :&str) -> ElementBuilder {
        Element::builder(name, self.ns.as_str())
    }

    fn reference(&self, name :&str, r :&str) -> Element {
        self.el(name).attr("ref", r).build()
    }

    fn infrastructure(&self, inf :&Infrastructure) -> Element {
        let mut e = self.el("infrastructure")
            .attr("id", inf.id.as_str())
            .append(self.topology(&inf.topology));
        if let Some(f) = &inf.functional {
            e = e.append(self.functional(f));
        }
        e.build()
    }

    fn topology(&self, topo :&NetTopology) -> Element {
        self.el("topology")
            .append(self.el("netElements")
                    .append_all(topo.net_elements.iter().map(|n| self.net_element(n))))
            .append(self.el("netRelations")
                    .append_all(topo.net_relations.iter().map(|r| self.net_relation(r))))
            .append(self.el("networks").append(self.network(&topo.network)))
            .build()
    }

    fn net_element(&self, ne :&NetElement) -> Element {
        let aps = &ne.positioning;
        self.el("netElement")
            .attr("id", ne.id.as_str())
            .append(self.el("associatedPositioningSystem")
                    .attr("id", aps.id.as_str())
                    .append_all(aps.intrinsic_coordinates.iter().map(|c| {
                        self.el("intrinsicCoordinate")
                            .attr("id", c.id.as_str())
                            .attr("intrinsicCoord", num(c.intrinsic_coord))
                            .build()
                    })))
            .build()
    }

    fn net_relation(&self, r :&NetRelation) -> Element {
        self.el("netRelation")
            .attr("id", r.id.as_str())
            .attr("positionOnA", pos(r.position_on_a))
            .attr("positionOnB", pos(r.position_on_b))
            .attr("navigability", r.navigability.as_str())
            .append(self.reference("elementA", &r.element_a))
            .append(self.reference("elementB", &r.element_b))
            .build()
    }

    fn network(&self, nw :&Network) -> Element {
        self.el("network")
            .attr("id", nw.id.as_str())
            .append(self.el("level")
                    .attr("id", nw.level.id.as_str())
                    .attr("descriptionLevel", nw.level.description_level.as_str())
                    .append_all(nw.level.network_resources.iter()
                                .map(|r| self.reference("networkResource", r))))
            .build()
    }

    fn functional(&self, f :&FunctionalInfrastructure) -> Element {
        self.el("functionalInfrastructure")
            .append(self.el("switchesIS").append_all(f.switches.iter().map(|s| self.switch_is(s))))
            .append(self.el("signalsIS").append_all(f.signals.iter().map(|s| self.signal_is(s))))
            .append(self.el("tracks").append_all(f.tracks.iter().map(|t| {
                self.el("track").attr("id", t.id.as_str()).attr("type", t.r#type.as_str()).build()
            })))
            .build()
    }

    fn name(&self, n :&Name) -> Element {
        self.el("name")
            .attr("name", n.name.as_str())
            .attr("language", n.language.as_str())
            .build()
    }

    fn spot_location(&self, s :&SpotLocation) -> Element {
        self.el("spotLocation")
            .attr("id", s.id.as_str())
            .attr("netElementRef", s.net_element_ref.as_str())
            .attr("pos", num(s.pos))
            .attr("applicationDirection", s.application_direction.as_str())
            .build()
    }

    fn branch(&self, tag :&str, b :&SwitchBranch) -> Element {
        self.el(tag)
            .attr("netRelationRef", b.net_relation_ref.as_str())
            .attr("branchingSpeed", b.branching_speed.map(num))
            .attr("joiningSpeed", b.joining_speed.map(num))
            .build()
    }

    fn switch_is(&self, s :&SwitchIS) -> Element {
        self.el("switchIS")
            .attr("id", s.id.as_str())
            .attr("type", s.r#type.as_str())
            .attr("continueCourse", s.continue_course.map(|c| c.as_str()))
            .attr("branchCourse", s.branch_course.map(|c| c.as_str()))
            .append(self.name(&s.name))
            .append(self.branch("leftBranch", &s.left_branch))
            .append(self.branch("rightBranch", &s.right_branch))
            .append(self.spot_location(&s.spot_location))
            .append(self.el("locationReference")
                    .attr("referencePoint", s.location_reference.reference_point.as_str())
                    .attr("tangentLength", num(s.location_reference.tangent_length)))
            .build()
    }

    fn signal_is(&self, s :&SignalIS) -> Element {
        let mut e = self.el("signalIS")
            .attr("id", s.id.as_str())
            .attr("isSwitchable", if s.is_switchable { "true" } else { "false" })
            .append(self.el("isTrainMovementSignal"))
            .append(self.spot_location(&s.spot_location));
        if let Some(n) = &s.name {
            e = e.append(self.name(n));
        }
        e.build()
    }

    fn interlocking(&self, il :&Interlocking) -> Element {
        let assets = &il.assets;
        self.el("interlocking")
            .append(self.el("assetsForInterlockings")
                    .append(self.el("assetsForInterlocking")
                            .attr("id", assets.id.as_str())
                            .append(self.el("signalsIL")
                                    .append_all(assets.signals.iter().map(|s| self.signal_il(s))))
                            .append(self.el("switchesIL")
                                    .append_all(assets.switches.iter().map(|s| self.switch_il(s))))))
            .build()
    }

    fn signal_il(&self, s :&SignalIL) -> Element {
        self.el("signalIL")
            .attr("id", s.id.as_str())
            .attr("function", s.function.map(|f| f.as_str()))
            .append(self.reference("refersTo", &s.refers_to))
            .build()
    }

    fn switch_il(&self, s :&SwitchIL) -> Element {
        self.el("switchIL")
            .attr("id", s.id.as_str())
            .append(self.reference("refersTo", &s.refers_to))
            .append(self.reference("branchLeft", &s.branch_left))
            .append(self.reference("branchRight", &s.branch_right))
            .build()
    }
}

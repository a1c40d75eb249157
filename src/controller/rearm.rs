use std::collections::HashMap;
use std::rc::Rc;

use tracing::info;

use crate::ofp::{Action, Datapath, FlowMod, Match, Message};
use crate::SwitchId;

pub const PRIORITY_MISS: u16 = 0;

struct MissFlowEntry {
    datapath: Rc<dyn Datapath>,
    match_fields: Match,
    actions: Vec<Action>,
}

/// Owns the table-miss rule of every connected switch and puts it back
/// after a link failure wiped the switch's table.
#[derive(Default)]
pub struct MissFlowRearmer {
    entries: HashMap<SwitchId, MissFlowEntry>,
}

impl MissFlowRearmer {
    pub fn new() -> Self {
        MissFlowRearmer::default()
    }
    /// Installs the lowest-priority match-all rule that sends unmatched
    /// packets to the controller unbuffered, and remembers it.
    pub fn install(&mut self, datapath: Rc<dyn Datapath>) {
        let match_fields = Match::match_all();
        let actions = vec![Action::to_controller()];
        datapath.send_msg(Message::FlowMod(FlowMod::add(
            PRIORITY_MISS,
            match_fields.clone(),
            actions.clone(),
        )));
        self.entries.insert(
            datapath.id(),
            MissFlowEntry {
                datapath,
                match_fields,
                actions,
            },
        );
    }
    pub fn forget(&mut self, dpid: SwitchId) -> bool {
        self.entries.remove(&dpid).is_some()
    }
    pub fn datapath(&self, dpid: SwitchId) -> Option<Rc<dyn Datapath>> {
        self.entries.get(&dpid).map(|entry| entry.datapath.clone())
    }
    pub fn get_miss_flow(&self, dpid: SwitchId) -> Option<(&Match, &[Action])> {
        self.entries
            .get(&dpid)
            .map(|entry| (&entry.match_fields, entry.actions.as_slice()))
    }
    /// Empties table 0 of every listed switch, then reinstalls each one's
    /// remembered miss rule without idle timeout. Unknown switches are
    /// skipped. Returns how many switches were rearmed.
    pub fn rearm(&self, switches: &[SwitchId]) -> usize {
        let mut targets: Vec<&MissFlowEntry> = vec![];
        for id in switches {
            if let Some(entry) = self.entries.get(id) {
                if !targets.iter().any(|t| t.datapath.id() == *id) {
                    targets.push(entry);
                }
            }
        }
        for entry in targets.iter() {
            entry
                .datapath
                .send_msg(Message::FlowMod(FlowMod::delete_all(0, Match::match_all())));
            info!(switch = entry.datapath.id(), "all flow entries of table 0 removed");
        }
        for entry in targets.iter() {
            entry.datapath.send_msg(Message::FlowMod(FlowMod::add(
                PRIORITY_MISS,
                entry.match_fields.clone(),
                entry.actions.clone(),
            )));
        }
        targets.len()
    }
}

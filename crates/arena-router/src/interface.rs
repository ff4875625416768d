use std::collections::{BTreeMap, HashMap};

use arena_core::tokens::{
    canonical_signature, derive_event_topic, derive_selector, normalize_signature,
};
use arena_core::{Selector, Topic};
use serde::{Deserialize, Serialize};

use crate::error::InterfaceError;

/// One typed input or output of a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub indexed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionFragment {
    pub name: String,
    pub signature: String,
    pub selector: Selector,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub state_mutability: String,
}

impl FunctionFragment {
    /// True for functions that do not change remote state.
    pub fn is_view(&self) -> bool {
        matches!(self.state_mutability.as_str(), "view" | "pure")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventFragment {
    pub name: String,
    pub signature: String,
    pub topic: Topic,
    pub inputs: Vec<Param>,
    pub anonymous: bool,
}

impl EventFragment {
    /// Number of inputs that can be matched by a filter.
    pub fn indexed_count(&self) -> usize {
        self.inputs.iter().filter(|p| p.indexed).count()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum FragmentDescriptor {
    Function {
        name: String,
        #[serde(default)]
        inputs: Vec<Param>,
        #[serde(default)]
        outputs: Vec<Param>,
        #[serde(default, rename = "stateMutability")]
        state_mutability: Option<String>,
    },
    Event {
        name: String,
        #[serde(default)]
        inputs: Vec<Param>,
        #[serde(default)]
        anonymous: bool,
    },
    #[serde(other)]
    Other,
}

fn signature_of(name: &str, inputs: &[Param]) -> String {
    let types: Vec<&str> = inputs.iter().map(|p| p.ty.as_str()).collect();
    canonical_signature(name, &types)
}

/// Looks `member` up either by full signature or by unique bare name.
fn lookup<'a, V>(
    by_signature: &'a BTreeMap<String, V>,
    by_name: &HashMap<String, Vec<String>>,
    member: &str,
) -> Option<&'a V> {
    if member.contains('(') {
        let signature = normalize_signature(member).ok()?;
        return by_signature.get(&signature);
    }
    match by_name.get(member).map(Vec::as_slice) {
        Some([only]) => by_signature.get(only),
        _ => None,
    }
}

/// Function and event tables of one facet (or of the primary interface).
///
/// Members are addressable by full signature, and by bare name when the
/// name is not overloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetInterface {
    functions: BTreeMap<String, FunctionFragment>,
    function_names: HashMap<String, Vec<String>>,
    events: BTreeMap<String, EventFragment>,
    event_names: HashMap<String, Vec<String>>,
    topics: HashMap<Topic, String>,
}

impl FacetInterface {
    /// Parses a JSON fragment array descriptor.
    ///
    /// Fragments other than functions and events are ignored.
    pub fn from_json(descriptor: &str) -> Result<Self, InterfaceError> {
        let fragments: Vec<FragmentDescriptor> = serde_json::from_str(descriptor)?;
        let mut iface = Self::default();
        for fragment in fragments {
            match fragment {
                FragmentDescriptor::Function {
                    name,
                    inputs,
                    outputs,
                    state_mutability,
                } => iface.add_function(
                    name,
                    inputs,
                    outputs,
                    state_mutability.unwrap_or_else(|| "nonpayable".to_string()),
                )?,
                FragmentDescriptor::Event {
                    name,
                    inputs,
                    anonymous,
                } => iface.add_event(name, inputs, anonymous)?,
                FragmentDescriptor::Other => {}
            }
        }
        Ok(iface)
    }

    /// Parses human-readable fragments such as `"function joinGame(uint256,bytes)"`
    /// or `"event GameCreated(uint256 indexed gid, address creator)"`.
    pub fn from_human<S: AsRef<str>>(fragments: &[S]) -> Result<Self, InterfaceError> {
        let mut iface = Self::default();
        for fragment in fragments {
            let fragment = fragment.as_ref().trim();
            let (keyword, rest) = fragment
                .split_once(char::is_whitespace)
                .ok_or(InterfaceError::Fragment("missing fragment keyword"))?;
            let (name, inputs) = parse_human_signature(rest)?;
            match keyword {
                "function" => {
                    iface.add_function(name, inputs, Vec::new(), "nonpayable".to_string())?
                }
                "event" => iface.add_event(name, inputs, false)?,
                _ => return Err(InterfaceError::Fragment("unknown fragment keyword")),
            }
        }
        Ok(iface)
    }

    fn add_function(
        &mut self,
        name: String,
        inputs: Vec<Param>,
        outputs: Vec<Param>,
        state_mutability: String,
    ) -> Result<(), InterfaceError> {
        if name.trim().is_empty() {
            return Err(InterfaceError::Fragment("function name is empty"));
        }
        let signature = signature_of(&name, &inputs);
        if self.functions.contains_key(&signature) {
            return Err(InterfaceError::Duplicate(signature));
        }
        self.function_names
            .entry(name.clone())
            .or_default()
            .push(signature.clone());
        self.functions.insert(
            signature.clone(),
            FunctionFragment {
                selector: derive_selector(&signature),
                name,
                signature,
                inputs,
                outputs,
                state_mutability,
            },
        );
        Ok(())
    }

    fn add_event(
        &mut self,
        name: String,
        inputs: Vec<Param>,
        anonymous: bool,
    ) -> Result<(), InterfaceError> {
        if name.trim().is_empty() {
            return Err(InterfaceError::Fragment("event name is empty"));
        }
        let signature = signature_of(&name, &inputs);
        if self.events.contains_key(&signature) {
            return Err(InterfaceError::Duplicate(signature));
        }
        let topic = derive_event_topic(&signature);
        self.event_names
            .entry(name.clone())
            .or_default()
            .push(signature.clone());
        if !anonymous {
            self.topics.insert(topic, signature.clone());
        }
        self.events.insert(
            signature.clone(),
            EventFragment {
                name,
                signature,
                topic,
                inputs,
                anonymous,
            },
        );
        Ok(())
    }

    /// Function addressed by `member`, a bare name or a full signature.
    pub fn function(&self, member: &str) -> Option<&FunctionFragment> {
        lookup(&self.functions, &self.function_names, member)
    }

    pub fn defines(&self, member: &str) -> bool {
        self.function(member).is_some()
    }

    /// Event addressed by bare name or full signature.
    pub fn event(&self, member: &str) -> Option<&EventFragment> {
        lookup(&self.events, &self.event_names, member)
    }

    /// Recognizes an event by its topic.
    pub fn get_event(&self, topic: &Topic) -> Result<&EventFragment, InterfaceError> {
        self.topics
            .get(topic)
            .and_then(|signature| self.events.get(signature))
            .ok_or(InterfaceError::UnknownTopic(*topic))
    }

    /// Functions in signature order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionFragment> + '_ {
        self.functions.values()
    }

    /// Events in signature order.
    pub fn events(&self) -> impl Iterator<Item = &EventFragment> + '_ {
        self.events.values()
    }

    /// Function selectors with their signatures.
    ///
    /// Signatures starting with any non-empty `exclude` prefix are skipped.
    /// Order is by signature, or by selector bytes when `sort` is set.
    pub fn selectors<S: AsRef<str>>(&self, exclude: &[S], sort: bool) -> Vec<(Selector, &str)> {
        let mut out: Vec<(Selector, &str)> = self
            .functions
            .values()
            .filter(|f| {
                !exclude
                    .iter()
                    .map(AsRef::as_ref)
                    .any(|prefix| !prefix.is_empty() && f.signature.starts_with(prefix))
            })
            .map(|f| (f.selector, f.signature.as_str()))
            .collect();
        if sort {
            out.sort_by_key(|(selector, _)| *selector);
        }
        out
    }
}

fn parse_human_signature(text: &str) -> Result<(String, Vec<Param>), InterfaceError> {
    let text = text.trim();
    let open = text
        .find('(')
        .ok_or(InterfaceError::Fragment("missing '('"))?;
    let close = text
        .rfind(')')
        .ok_or(InterfaceError::Fragment("missing ')'"))?;
    if close < open {
        return Err(InterfaceError::Fragment("unbalanced parentheses"));
    }
    let name = text[..open].trim().to_string();
    let inner = text[open + 1..close].trim();
    let mut inputs = Vec::new();
    if !inner.is_empty() {
        for raw in inner.split(',') {
            let mut words = raw.split_whitespace();
            let ty = words
                .next()
                .ok_or(InterfaceError::Fragment("empty parameter"))?
                .to_string();
            let mut param = Param {
                name: String::new(),
                ty,
                indexed: false,
            };
            for word in words {
                if word == "indexed" {
                    param.indexed = true;
                } else {
                    param.name = word.to_string();
                }
            }
            inputs.push(param);
        }
    }
    Ok((name, inputs))
}

/// ABI encoding of a `bytes4[]`: offset word, length word, then one
/// left-aligned 32-byte word per selector.
pub fn encode_selector_array(selectors: &[Selector]) -> Vec<u8> {
    let mut out = Vec::with_capacity(64 + 32 * selectors.len());
    let mut word = [0_u8; 32];
    word[24..].copy_from_slice(&32_u64.to_be_bytes());
    out.extend_from_slice(&word);
    word = [0_u8; 32];
    word[24..].copy_from_slice(&(selectors.len() as u64).to_be_bytes());
    out.extend_from_slice(&word);
    for selector in selectors {
        word = [0_u8; 32];
        word[..4].copy_from_slice(&selector.0);
        out.extend_from_slice(&word);
    }
    out
}

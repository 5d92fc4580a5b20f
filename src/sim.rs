//! Simulation scripts.
//!
//! A script is a whitespace separated list of items:
//!
//! - `d:<key>` presses a key and `u:<key>` releases it,
//! - `t:<ms>` lets time pass.
//!
//! `<key>` is either a key code name such as `j`, `spc` or `;`, which picks
//! the first base layer position whose tap key code it is, or an explicit
//! `row,col` position. The host output is printed like
//! `t:185ms dn:LShift t:40ms dn:A`, each time being relative to the previous
//! output.

use itertools::Itertools;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use homerow_resolver::{
    Action, Event, KCoord, KeyCode, LayerTable, ResolverContext, ResolverHooks, BASE,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimItem {
    Press(KCoord),
    Release(KCoord),
    Wait(u64),
}

#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Error in simulation script")]
#[diagnostic()]
pub struct SimError {
    #[label("Error here")]
    pub err_span: Option<SourceSpan>,
    #[help]
    pub help_msg: String,
}

impl SimError {
    fn at(start: usize, item: &str, msg: impl Into<String>) -> Self {
        Self {
            err_span: Some(SourceSpan::new(start.into(), item.len().into())),
            help_msg: msg.into(),
        }
    }
}

/// Attaches the script text so that the error renders with its snippet.
pub fn error_with_source(e: SimError, name: &str, script: &str) -> miette::Error {
    let e: miette::Error = e.into();
    e.with_source_code(NamedSource::new(name, script.to_string()))
}

/// Splits `script` on whitespace, keeping the byte offset of each item.
fn items(script: &str) -> Vec<(usize, &str)> {
    let mut items = vec![];
    let mut start = None;
    for (i, c) in script.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                items.push((s, &script[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        items.push((s, &script[s..]));
    }
    items
}

fn key_coord(val: &str, layers: &LayerTable) -> Result<KCoord, String> {
    if let Some((row, col)) = val.split_once(',') {
        if let (Ok(row), Ok(col)) = (row.parse::<u8>(), col.parse::<u16>()) {
            return match layers.get(BASE, (row, col)) {
                Some(_) => Ok((row, col)),
                None => Err(format!("there is no key at row {row}, column {col}")),
            };
        }
    }
    let kc = KeyCode::from_name(val).ok_or_else(|| format!("unknown key: {val}"))?;
    layers
        .find_tap_on_base(kc)
        .ok_or_else(|| format!("{val} is not on the base layer, use a row,col position"))
}

/// Parses a script against the layers it will run on.
pub fn parse(script: &str, layers: &LayerTable) -> Result<Vec<SimItem>, SimError> {
    items(script)
        .into_iter()
        .map(|(start, item)| {
            let Some((kind, val)) = item.split_once(':') else {
                return Err(SimError::at(
                    start,
                    item,
                    "expected an item like d:<key>, u:<key> or t:<ms>",
                ));
            };
            let parsed = match kind {
                "d" => key_coord(val, layers).map(SimItem::Press),
                "u" => key_coord(val, layers).map(SimItem::Release),
                "t" => val
                    .parse::<u64>()
                    .map(SimItem::Wait)
                    .map_err(|_| format!("invalid number of milliseconds: {val}")),
                _ => Err(format!("invalid item kind: {kind}")),
            };
            parsed.map_err(|msg| SimError::at(start, item, msg))
        })
        .collect()
}

/// Runs parsed items and returns every host action with the time it
/// happened at.
pub fn run<H: ResolverHooks>(
    ctx: &mut ResolverContext<H>,
    items: &[SimItem],
) -> Vec<(u64, Action)> {
    let mut log = vec![];
    for item in items {
        match *item {
            SimItem::Press((i, j)) => ctx.event(Event::Press(i, j)),
            SimItem::Release((i, j)) => ctx.event(Event::Release(i, j)),
            SimItem::Wait(ms) => {
                for _ in 0..ms {
                    let now = ctx.now() + 1;
                    log.extend(ctx.tick(now).into_iter().map(|a| (now, a)));
                }
                continue;
            }
        }
        let now = ctx.now();
        log.extend(ctx.tick(now).into_iter().map(|a| (now, a)));
    }
    log
}

/// Formats a log as `t:<ms>ms dn:<key> up:<key> sys:<action>`. Actions
/// that happen together share one time item.
pub fn format_log(log: &[(u64, Action)]) -> String {
    let mut prev = 0;
    log.iter()
        .map(|(at, action)| {
            let out = match action {
                Action::Press(kc) => format!("dn:{kc:?}"),
                Action::Release(kc) => format!("up:{kc:?}"),
                Action::System(sys) => format!("sys:{sys:?}"),
            };
            let elapsed = at - prev;
            prev = *at;
            if elapsed > 0 {
                format!("t:{elapsed}ms {out}")
            } else {
                out
            }
        })
        .join(" ")
}

/// Parses and runs `script`, returning the formatted host output.
pub fn simulate<H: ResolverHooks>(
    ctx: &mut ResolverContext<H>,
    script: &str,
) -> Result<String, SimError> {
    let items = parse(script, ctx.layers())?;
    let log = run(ctx, &items);
    log::debug!("{} items gave {} host actions", items.len(), log.len());
    Ok(format_log(&log))
}

#[cfg(test)]
mod test {
    use super::*;
    use homerow_resolver::{k, mt, Hand, SystemAction};

    #[test]
    fn items_keep_their_offsets() {
        assert_eq!(
            vec![(0, "d:a"), (5, "t:10"), (10, "u:a")],
            items("d:a  t:10\tu:a\n")
        );
        assert!(items("  \n").is_empty());
    }

    #[test]
    fn keys_by_name_or_position() {
        use KeyCode::*;
        let layers = LayerTable::new(vec![vec![
            vec![k(A), mt(LShift, F, 185)],
            vec![k(Comma), k(A)],
        ]])
        .unwrap();
        assert_eq!(Ok((0, 0)), key_coord("a", &layers));
        assert_eq!(Ok((0, 1)), key_coord("F", &layers));
        assert_eq!(Ok((1, 0)), key_coord(",", &layers));
        assert_eq!(Ok((1, 1)), key_coord("1,1", &layers));
        assert!(key_coord("2,0", &layers).is_err());
        assert!(key_coord("j", &layers).is_err());
        assert!(key_coord("nope", &layers).is_err());
    }

    #[test]
    fn bad_items_point_at_themselves() {
        let layers = LayerTable::new(vec![vec![vec![k(KeyCode::A)]]]).unwrap();
        let e = parse("d:a t:1x u:a", &layers).unwrap_err();
        assert_eq!(Some(SourceSpan::new(4.into(), 4.into())), e.err_span);
        let e = parse("d:a x", &layers).unwrap_err();
        assert_eq!(Some(SourceSpan::new(4.into(), 1.into())), e.err_span);
        assert_eq!(
            vec![SimItem::Press((0, 0)), SimItem::Wait(5), SimItem::Release((0, 0))],
            parse("d:a t:5 u:a", &layers).unwrap()
        );
    }

    #[test]
    fn log_times_are_relative() {
        use KeyCode::*;
        let log = [
            (50, Action::Press(LShift)),
            (50, Action::Press(A)),
            (60, Action::Release(A)),
            (60, Action::Release(LShift)),
            (61, Action::System(SystemAction::Bootloader)),
        ];
        assert_eq!(
            "t:50ms dn:LShift dn:A t:10ms up:A up:LShift t:1ms sys:Bootloader",
            format_log(&log)
        );
        assert_eq!("", format_log(&[]));
    }

    struct Pad;

    impl ResolverHooks for Pad {
        fn hand(&self, _: KCoord) -> Hand {
            Hand::Any
        }
    }

    #[test]
    fn runs_against_a_context() {
        use homerow_resolver::{Keymap, ResolverConfig};
        let keymap = Keymap {
            layers: vec![vec![vec![k(KeyCode::A), k(KeyCode::B)]]],
            combos: vec![],
            config: ResolverConfig::default(),
        };
        let mut ctx = ResolverContext::new(keymap, Pad).unwrap();
        assert_eq!(
            "dn:A t:20ms dn:B t:5ms up:A up:B",
            simulate(&mut ctx, "d:a t:20 d:b t:5 u:a u:b").unwrap()
        );
    }
}

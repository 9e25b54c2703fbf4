use std::collections::{HashMap, HashSet};
use rayon::prelude::*;
use crate::graph::{components, overlaps};
use crate::graph::merge::{merge, MergeStrategy};
use crate::types::{Buffer, Context, Scope, Street};

///
/// Collapse every connected component of overlapping buffers within one group
///
/// Components of one record are returned unchanged, larger components are
/// replaced by their representative. Output follows component order. The pass is
/// not repeated, see `resolve_group_until_stable`.
///
pub fn resolve_group(records: Vec<Street>, tolerance: f64, strategy: &dyn MergeStrategy) -> Vec<Street> {
    if records.is_empty() {
        return records;
    }

    let groups = {
        let buffers: Vec<Buffer> = records.iter().map(|record| record.buffer(tolerance)).collect();
        components(&overlaps(&buffers))
    };

    let mut slots: Vec<Option<Street>> = records.into_iter().map(Some).collect();
    let mut resolved: Vec<Street> = Vec::with_capacity(groups.len());

    for group in groups {
        let members: Vec<Street> = group.iter().filter_map(|i| slots[*i].take()).collect();

        if members.len() == 1 {
            resolved.extend(members);
        } else if let Some(representative) = merge(members, strategy) {
            resolved.push(representative);
        }
    }

    resolved
}

///
/// Repeat `resolve_group` until a pass no longer reduces the group
///
pub fn resolve_group_until_stable(records: Vec<Street>, tolerance: f64, strategy: &dyn MergeStrategy) -> Vec<Street> {
    let mut records = records;

    loop {
        let before = records.len();
        records = resolve_group(records, tolerance, strategy);

        if records.len() == before {
            return records;
        }
    }
}

///
/// Split records into independent groups, in order of first appearance
///
pub fn partition(records: Vec<Street>, scope: Scope) -> Vec<Vec<Street>> {
    let mut index: HashMap<(String, Option<i32>), usize> = HashMap::new();
    let mut groups: Vec<Vec<Street>> = Vec::new();

    for record in records {
        let key = match scope {
            Scope::Name => (record.name.clone(), None),
            Scope::NameYear => (record.name.clone(), record.years.first().cloned())
        };

        match index.get(&key) {
            Some(i) => groups[*i].push(record),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![record]);
            }
        };
    }

    groups
}

///
/// Number of groups `partition` would produce
///
pub fn group_count(records: &[Street], scope: Scope) -> usize {
    let keys: HashSet<(&str, Option<i32>)> = records.iter().map(|record| match scope {
        Scope::Name => (record.name.as_str(), None),
        Scope::NameYear => (record.name.as_str(), record.years.first().cloned())
    }).collect();

    keys.len()
}

///
/// Resolve duplicates across the full record set
///
pub fn resolve_all(records: Vec<Street>, context: &Context) -> Result<Vec<Street>, String> {
    resolve_all_with(records, context, || ())
}

///
/// As `resolve_all`, calling `tick` once per resolved group
///
/// Groups share no state and are resolved on a pool of `context.threads` workers.
/// The output keeps group order regardless of scheduling.
///
pub fn resolve_all_with<F>(records: Vec<Street>, context: &Context, tick: F) -> Result<Vec<Street>, String>
    where F: Fn() + Sync
{
    let strategy = context.strategy();
    let strategy: &dyn MergeStrategy = strategy.as_ref();

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(context.threads).build() {
        Ok(pool) => pool,
        Err(err) => { return Err(format!("Failed to build worker pool: {}", err)); }
    };

    let groups = partition(records, context.scope);

    let resolved: Vec<Vec<Street>> = pool.install(|| {
        groups.into_par_iter().map(|group| {
            let group = if context.iterate {
                resolve_group_until_stable(group, context.tolerance, strategy)
            } else {
                resolve_group(group, context.tolerance, strategy)
            };

            tick();

            group
        }).collect()
    });

    Ok(resolved.into_iter().flatten().collect())
}

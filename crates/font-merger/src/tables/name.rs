//! name table merging

use std::collections::HashSet;

use crate::model::FontTableSet;

/// Append incoming name records whose name id the base does not use.
///
/// Name ids are matched against the base records as they were before this
/// call, so an incoming font contributes every language variant of a name
/// id that is new to the base. Returns the number of records appended.
pub fn merge_names(base: &mut FontTableSet, incoming: &FontTableSet) -> usize {
    let known: HashSet<u16> = base.name_records.iter().map(|record| record.name_id).collect();
    let before = base.name_records.len();
    base.name_records.extend(
        incoming.name_records.iter().filter(|record| !known.contains(&record.name_id)).cloned(),
    );
    base.name_records.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NameRecord;

    #[test]
    fn test_base_name_ids_win() {
        let mut base = FontTableSet::new(1000);
        base.name_records = vec![NameRecord::new(1, 3, 1, 0x409, "Base Family")];
        let mut incoming = FontTableSet::new(1000);
        incoming.name_records = vec![
            NameRecord::new(1, 3, 1, 0x409, "Other Family"),
            NameRecord::new(1, 3, 1, 0x804, "Other Family zh"),
            NameRecord::new(13, 3, 1, 0x409, "License"),
            NameRecord::new(13, 3, 1, 0x804, "License zh"),
        ];

        assert_eq!(merge_names(&mut base, &incoming), 2);

        assert_eq!(base.name(1), Some("Base Family"));
        let licenses: Vec<_> = base
            .name_records
            .iter()
            .filter(|r| r.name_id == 13)
            .map(|r| r.value.as_str())
            .collect();
        assert_eq!(licenses, ["License", "License zh"]);
    }
}

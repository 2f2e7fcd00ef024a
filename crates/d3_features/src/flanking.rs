/// Length of the motif's first strand; strands are separated by `_` or `&`.
pub fn first_strand_length(motif: &str) -> usize {
    motif.split(['_', '&']).next().map_or(0, |s| s.chars().count())
}

/// Whether a base pair closes the motif or sits at its strand junction.
///
/// Residues are numbered as in the motif constructs: the pair is flanking
/// if one residue is 3 and one is `motif_length + 5` (outer closing pair),
/// or if one is `L + 2` and one is `L + 7` with `L` the first-strand
/// length. Either residue may satisfy either condition.
pub fn is_flanking_pair(motif: &str, residues: (i32, i32)) -> bool {
    let (r1, r2) = residues;
    let either = |v: i32| r1 == v || r2 == v;
    let motif_length = motif.chars().count() as i32;
    let strand = first_strand_length(motif) as i32;

    (either(3) && either(motif_length + 5))
        || (either(strand + 2) && either(strand + 7))
}

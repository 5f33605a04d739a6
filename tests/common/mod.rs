//! Shared fixtures for integration tests.

#![allow(dead_code)]

/// CYP2C19-like gene with `*38` as the reference, plus a small gene with an
/// ambiguity code and a gene whose data is broken
pub const CATALOG_JSON: &str = r#"{
    "version": "1.0.0",
    "genes": [
        {
            "gene": "CYP2C19",
            "chromosome": "chr10",
            "positions": [
                {"chromosome": "chr10", "position": 94761900, "ref": "C", "rsid": "rs12248560"},
                {"chromosome": "chr10", "position": 94762706, "ref": "A", "rsid": "rs28399504"},
                {"chromosome": "chr10", "position": 94780653, "ref": "G", "rsid": "rs4986893"},
                {"chromosome": "chr10", "position": 94781859, "ref": "G", "rsid": "rs4244285"}
            ],
            "namedAlleles": [
                {"id": "CA10017.1", "name": "*17", "alleles": ["T", null, null, null]},
                {"id": "CA10002.1", "name": "*2", "alleles": [null, null, null, "A"]},
                {"id": "CA10038.1", "name": "*38", "alleles": ["C", "A", "G", "G"], "matchesreferencesequence": true},
                {"id": "CA10003.1", "name": "*3", "alleles": [null, null, "A", null]},
                {"id": "CA10004.1", "name": "*4", "alleles": [null, "G", null, null]}
            ]
        },
        {
            "gene": "WOBBLE",
            "positions": [
                {"chromosome": "chr1", "position": 100, "ref": "A"},
                {"chromosome": "chr1", "position": 200, "ref": "C"}
            ],
            "namedAlleles": [
                {"id": "W1", "name": "*1", "alleles": ["A", "C"], "reference": true},
                {"id": "W2", "name": "*2", "alleles": ["R", "T"]}
            ]
        },
        {
            "gene": "BROKEN",
            "positions": [
                {"chromosome": "chr2", "position": 10, "ref": "T"}
            ],
            "namedAlleles": [
                {"id": "B2", "name": "*2", "alleles": ["A"]}
            ]
        }
    ]
}"#;

/// Two samples: one heterozygous for `*2` and `*17` (unphased), one with a
/// missing call at the `*2` position
pub const SAMPLES_JSON: &str = r#"[
    {
        "sample": "S1",
        "genes": {
            "CYP2C19": [
                {"chromosome": "chr10", "position": 94761900, "alleles": ["C", "T"]},
                {"chromosome": "chr10", "position": 94762706, "alleles": ["A", "A"]},
                {"chromosome": "chr10", "position": 94780653, "alleles": ["G", "G"]},
                {"chromosome": "chr10", "position": 94781859, "alleles": ["G", "A"]}
            ]
        }
    },
    {
        "sample": "S2",
        "genes": {
            "CYP2C19": [
                {"chromosome": "chr10", "position": 94761900, "alleles": ["C", "C"]},
                {"chromosome": "chr10", "position": 94762706, "alleles": ["A", "A"]},
                {"chromosome": "chr10", "position": 94780653, "alleles": ["G", "G"]},
                {"chromosome": "chr10", "position": 94781859, "alleles": ["."]}
            ],
            "WOBBLE": [
                {"chromosome": "chr1", "position": 100, "alleles": ["A", "A"]},
                {"chromosome": "chr1", "position": 200, "alleles": ["T", "T"]}
            ]
        }
    }
]"#;

pub const CYP2C19_COORDINATES: [u64; 4] = [94_761_900, 94_762_706, 94_780_653, 94_781_859];

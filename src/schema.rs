// jstat column titles and the explicit metric names they are reported under.
//
// Column meanings are from https://docs.oracle.com/javase/8/docs/technotes/tools/unix/jstat.html.
// Each category is one jstat option.  Titles are unique within a category but not across them
// (S0C appears under -gc, -gccapacity and -gcnew), which is why metric keys carry the category as
// a prefix.
//
// -class prints "Bytes" twice, for loaded and unloaded kB.  The table below cannot tell those
// apart, so the parser renames the titles at positions 1 and 3 to Bytes_column2 / Bytes_column4
// before looking them up.

use lazy_static::lazy_static;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Gc,
    GcCapacity,
    GcNew,
    GcCause,
    Compiler,
    Class,
}

// The categories collected for every process, in this order.  GcCause is defined but not collected.
pub const DEFAULT_CATEGORIES: [Category; 5] = [
    Category::Gc,
    Category::GcCapacity,
    Category::GcNew,
    Category::Compiler,
    Category::Class,
];

pub type Mapping = HashMap<&'static str, &'static str>;

impl Category {
    /// The jstat option, "-gc" etc.
    pub fn flag(self) -> &'static str {
        match self {
            Category::Gc => "-gc",
            Category::GcCapacity => "-gccapacity",
            Category::GcNew => "-gcnew",
            Category::GcCause => "-gccause",
            Category::Compiler => "-compiler",
            Category::Class => "-class",
        }
    }

    /// The option without its leading dash, used as the metric key prefix.
    pub fn name(self) -> &'static str {
        &self.flag()[1..]
    }

    pub fn columns(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Gc => GC_COLUMNS,
            Category::GcCapacity => GCCAPACITY_COLUMNS,
            Category::GcNew => GCNEW_COLUMNS,
            Category::GcCause => GCCAUSE_COLUMNS,
            Category::Compiler => COMPILER_COLUMNS,
            Category::Class => CLASS_COLUMNS,
        }
    }

    pub fn mapping(self) -> &'static Mapping {
        &MAPPINGS[&self]
    }

    pub fn lookup(self, title: &str) -> Option<&'static str> {
        self.mapping().get(title).copied()
    }
}

lazy_static! {
    static ref MAPPINGS: HashMap<Category, Mapping> = {
        let all = [
            Category::Gc,
            Category::GcCapacity,
            Category::GcNew,
            Category::GcCause,
            Category::Compiler,
            Category::Class,
        ];
        all.iter()
            .map(|c| (*c, c.columns().iter().copied().collect::<Mapping>()))
            .collect()
    };
}

const GC_COLUMNS: &[(&str, &str)] = &[
    ("S0C", "current_survivor_space_0_capacity_kB"),
    ("S1C", "current_survivor_space_1_capacity_kB"),
    ("S0U", "survivor_space_0_utilization_kB"),
    ("S1U", "survivor_space_1_utilization_kB"),
    ("EC", "current_eden_space_capacity_kB"),
    ("EU", "eden_space_utilization_kB"),
    ("OC", "current_old_space_capacity_kB"),
    ("OU", "old_space_utilization_kB"),
    ("MC", "metaspace_capacity_kB"),
    ("MU", "metaspace_utilization_kB"),
    ("CCSC", "compressed_class_space_capacity_kB"),
    ("CCSU", "compressed_class_space_utilization_kB"),
    ("PC", "current_permanent_space_capacity_kB"),
    ("PU", "permanent_space_utilization_kB"),
    ("YGC", "number_of_young_generation_GC_events"),
    ("YGCT", "young_generation_garbage_collection_time"),
    ("FGC", "number_of_stop_the_world_events"),
    ("FGCT", "full_garbage_collection_time"),
    ("GCT", "total_garbage_collection_time"),
];

const GCCAPACITY_COLUMNS: &[(&str, &str)] = &[
    ("NGCMN", "minimum_new_generation_capacity_kB"),
    ("NGCMX", "maximum_new_generation_capacity_kB"),
    ("NGC", "current_new_generation_capacity_kB"),
    ("S0C", "current_survivor_space_0_capacity_kB"),
    ("S1C", "current_survivor_space_1_capacity_kB"),
    ("EC", "current_eden_space_capacity_kB"),
    ("OGCMN", "minimum_old_generation_capacity_kB"),
    ("OGCMX", "maximum_old_generation_capacity_kB"),
    ("OGC", "current_old_generation_capacity_kB"),
    ("OC", "current_old_space_capacity_kB"),
    ("MCMN", "minimum_metaspace_capacity_kB"),
    ("MCMX", "maximum_metaspace_capacity_kB"),
    ("MC", "metaspace_capacity_kB"),
    ("CCSMN", "compressed_class_space_minimum_capacity_kB"),
    ("CCSMX", "compressed_class_space_maximum_capacity_kB"),
    ("CCSC", "compressed_class_space_capacity_kB"),
    ("YGC", "number_of_young_generation_GC_events"),
    ("FGC", "number_of_stop_the_world_events"),
];

const GCCAUSE_COLUMNS: &[(&str, &str)] = &[
    ("LGCC", "cause_of_last_garbage_collection"),
    ("GCC", "cause_of_current_garbage_collection"),
];

const GCNEW_COLUMNS: &[(&str, &str)] = &[
    ("S0C", "current_survivor_space_0_capacity_kB"),
    ("S1C", "current_survivor_space_1_capacity_kB"),
    ("S0U", "survivor_space_0_utilization_kB"),
    ("S1U", "survivor_space_1_utilization_kB"),
    ("TT", "tenuring_threshold"),
    ("MTT", "maximum_tenuring_threshold"),
    ("DSS", "desired_survivor_size_kB"),
    ("EC", "current_eden_space_capacity_kB"),
    ("EU", "eden_space_utilization_kB"),
    ("YGC", "number_of_young_generation_GC_events"),
    ("YGCT", "young_generation_garbage_collection_time"),
];

const COMPILER_COLUMNS: &[(&str, &str)] = &[
    ("Compiled", "number_of_compilation_tasks_performed"),
    ("Failed", "number_of_compilation_tasks_failed"),
    ("Invalid", "number_of_compilation_tasks_that_were_invalidated"),
    ("Time", "time_spent_performing_compilation_tasks"),
    ("FailedType", "compile_type_of_the_last_failed_compilation"),
    ("FailedMethod", "class_name_and_method_of_the_last_failed_compilation"),
];

const CLASS_COLUMNS: &[(&str, &str)] = &[
    ("Loaded", "number_of_classes_loaded"),
    ("Bytes_column2", "number_of_kBs_loaded"),
    ("Unloaded", "number_of_classes_unloaded"),
    ("Bytes_column4", "number_of_kBs_unloaded"),
    ("Time", "time_spent_performing_class_loading_and_unloading_operations"),
];

//! Follow-up advice shown with an assessment result.

use crate::models::NutritionStatus;

/// Three advice lines per status, in the language of the intake form.
pub fn recommendations(status: NutritionStatus) -> &'static [&'static str; 3] {
    match status {
        NutritionStatus::GiziBuruk => &[
            "Segera konsultasi ke dokter atau ahli gizi",
            "Pemberian makanan tinggi kalori dan protein",
            "Pemantauan rutin setiap minggu",
        ],
        NutritionStatus::GiziKurang => &[
            "Tingkatkan asupan makanan bergizi",
            "Berikan makanan kaya protein (telur, ikan, daging)",
            "Konsultasi ke Puskesmas atau ahli gizi",
        ],
        NutritionStatus::Stunting => &[
            "Fokus pada pemberian gizi seimbang",
            "Pastikan asupan protein, kalsium, dan vitamin D cukup",
            "Stimulasi tumbuh kembang anak",
        ],
        NutritionStatus::GiziLebih | NutritionStatus::Obesitas => &[
            "Kurangi makanan tinggi gula dan lemak",
            "Tingkatkan aktivitas fisik",
            "Konsumsi sayur dan buah lebih banyak",
        ],
        NutritionStatus::GiziBaik => &[
            "Pertahankan pola makan seimbang",
            "Lanjutkan pemantauan tumbuh kembang rutin",
            "Pastikan anak mendapat ASI/nutrisi yang cukup",
        ],
    }
}
